//! Transport seam for dictionary payloads.
//!
//! The loader only sees the [`Fetch`] trait. `HttpFetcher` talks to the
//! resource endpoint (`GET {base}/{language}/{namespace}.json`);
//! `BundledFetcher` serves the dictionaries embedded from `ui/locales/`.
//! `FallbackFetcher` chains two of them, so a deployment that does not
//! serve `/locales` still renders from the bundle.

use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use rust_embed::Embed;

use super::error::LoadError;

/// Fetches the raw body of a dictionary resource.
pub trait Fetch {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, LoadError>>;
}

/// Builds resource URLs below a base path or origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, language: &str, namespace: &str) -> String {
        format!("{}/{language}/{namespace}.json", self.base)
    }
}

/// Every dictionary shipped with the crate, as `{language}/{namespace}.json`.
#[derive(Embed)]
#[folder = "locales"]
pub struct BundledLocales;

impl BundledLocales {
    pub fn read(language: &str, namespace: &str) -> Option<String> {
        let file = Self::get(&format!("{language}/{namespace}.json"))?;
        Some(String::from_utf8_lossy(file.data.as_ref()).into_owned())
    }

    /// Language folders present in the bundle, sorted.
    pub fn languages() -> Vec<String> {
        let mut langs = Self::iter()
            .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
            .collect::<Vec<_>>();
        langs.sort();
        langs.dedup();
        langs
    }
}

/// Serves the embedded dictionaries. URLs are matched on their last two
/// path segments, so any base path works.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledFetcher;

impl Fetch for BundledFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, LoadError>> {
        let outcome = split_resource_url(url)
            .and_then(|(language, namespace)| BundledLocales::read(language, namespace))
            .ok_or_else(|| LoadError::NotFound(url.to_string()));
        future::ready(outcome).boxed_local()
    }
}

/// `.../{language}/{namespace}.json` -> `(language, namespace)`.
fn split_resource_url(url: &str) -> Option<(&str, &str)> {
    let path = url.split(['?', '#']).next()?;
    let mut segments = path.rsplit('/');
    let namespace = segments.next()?.strip_suffix(".json")?;
    let language = segments.next()?;
    if language.is_empty() || namespace.is_empty() {
        return None;
    }
    Some((language, namespace))
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, LoadError>> {
        async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|err| LoadError::Transport(err.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            response
                .text()
                .await
                .map_err(|err| LoadError::Transport(err.to_string()))
        }
        .boxed_local()
    }
}

/// Tries `primary` first and serves from `secondary` when it fails.
/// If both fail the primary's error is reported.
pub struct FallbackFetcher {
    primary: Rc<dyn Fetch>,
    secondary: Rc<dyn Fetch>,
}

impl FallbackFetcher {
    pub fn new(primary: Rc<dyn Fetch>, secondary: Rc<dyn Fetch>) -> Self {
        Self { primary, secondary }
    }
}

impl Fetch for FallbackFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, LoadError>> {
        async move {
            match self.primary.fetch(url).await {
                Ok(body) => Ok(body),
                Err(err) => {
                    tracing::debug!(url, %err, "primary transport failed, trying fallback");
                    self.secondary.fetch(url).await.map_err(|_| err)
                }
            }
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::loader::tests::ScriptedFetcher;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let endpoint = Endpoint::new("https://cdn.example/locales/");
        assert_eq!(
            endpoint.url("it", "common"),
            "https://cdn.example/locales/it/common.json"
        );
    }

    #[test]
    fn resource_url_is_split_from_the_tail() {
        assert_eq!(
            split_resource_url("/locales/en/auth.json?v=3"),
            Some(("en", "auth"))
        );
        assert_eq!(split_resource_url("/locales/en/auth.txt"), None);
        assert_eq!(split_resource_url("auth.json"), None);
    }

    #[test]
    fn bundle_contains_both_languages() {
        let langs = BundledLocales::languages();
        assert!(langs.contains(&"it".to_string()));
        assert!(langs.contains(&"en".to_string()));
    }

    #[tokio::test]
    async fn bundled_fetcher_serves_embedded_files() {
        let body = BundledFetcher.fetch("/locales/it/common.json").await.unwrap();
        assert!(body.contains("Fatturino"));

        let missing = BundledFetcher.fetch("/locales/it/nope.json").await;
        assert!(matches!(missing, Err(LoadError::NotFound(_))));
    }

    #[tokio::test]
    async fn fallback_serves_bundle_when_primary_fails() {
        let primary = ScriptedFetcher::failing();
        let fetcher = FallbackFetcher::new(primary.clone(), Rc::new(BundledFetcher));
        let body = fetcher.fetch("https://cdn.example/locales/it/common.json").await.unwrap();
        assert!(body.contains("Fatturino"));
        assert_eq!(primary.requests.get(), 1);

        let missing = fetcher.fetch("https://cdn.example/locales/it/nope.json").await;
        assert!(matches!(missing, Err(LoadError::Transport(_))));
    }

    #[tokio::test]
    async fn fallback_is_skipped_when_primary_answers() {
        let primary = ScriptedFetcher::always(r#"{"app":{"name":"Remote"}}"#);
        let secondary = ScriptedFetcher::failing();
        let fetcher = FallbackFetcher::new(primary.clone(), secondary.clone());
        let body = fetcher.fetch("/locales/it/common.json").await.unwrap();
        assert!(body.contains("Remote"));
        assert_eq!(secondary.requests.get(), 0);
    }
}
