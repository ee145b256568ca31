//! Internationalization (i18n) support for `fatturino-ui`.
//!
//! This module wires together:
//! - a bounded LRU cache of per-(language, namespace) dictionaries (`cache`)
//! - a retrying, de-duplicating loader over a pluggable transport (`loader`, `fetch`)
//! - tiered, route-driven preloading (`scheduler`)
//! - key resolution with plural/context variants and English fallback (`translate`)
//! - an offline completeness checker for CI (`completeness`)
//!
//! Folder layout (relative to this crate root):
//! ```text
//! i18n.toml                 (tiers, routes, retry/cache tuning)
//! locales/
//!   en/<namespace>.json     (fallback/reference)
//!   it/<namespace>.json     (default UI language)
//! ```
//!
//! Usage in a component (see `hooks` for the Dioxus glue):
//! ```ignore
//! use ui::i18n::{keys, TOptions};
//! use ui::t;
//! let tr = use_translation(keys::dashboard::NAMESPACE);
//! let title = t!(tr, keys::dashboard::TITLE);
//! let overdue = t!(tr, keys::dashboard::STATS_OVERDUE, count = 3);
//! ```
//!
//! To add a new locale:
//! 1. Copy `locales/en/` to `locales/<lang>/`.
//! 2. Translate each value (keep keys and `{{placeholders}}` identical).
//! 3. Add the code to `supported_languages` in `i18n.toml`.
//! 4. Run `cargo run -p fatturino-ui --bin i18n-check`.
//!
//! Nothing in here panics or returns an error on a missing translation: a
//! failed load serves an empty dictionary and an unresolved key renders as
//! itself.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

pub mod cache;
pub mod completeness;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod fetch;
pub mod hooks;
pub mod loader;
pub mod negotiate;
pub mod plural;
pub mod scheduler;
pub mod stats;
pub mod translate;

/// Key constants generated from the reference (`en`) dictionaries by
/// `build.rs`, one module per namespace.
pub mod keys {
    include!(concat!(env!("OUT_DIR"), "/keys.rs"));
}

pub use cache::{CacheKey, ResourceCache, SharedCache};
pub use config::I18nConfig;
pub use dictionary::Dictionary;
pub use error::{CheckError, ConfigError, LoadError};
pub use fetch::{BundledFetcher, BundledLocales, Endpoint, FallbackFetcher, Fetch, HttpFetcher};
pub use loader::{Loader, RetryPolicy};
pub use scheduler::{NamespacePlan, Planner, Priority, Scheduler};
pub use stats::{LoadStats, StatsSnapshot};
pub use translate::TOptions;

use crate::core::{platform::Platform, storage};
use translate::Resolution;

/// Ergonomic translation macro over a [`Translator`].
/// Examples:
///     t!(tr, "nav.clients")
///     t!(tr, "greeting", name = "Mario")
///     t!(tr, "documents:count", count = 3)
///
/// `count = ...` may appear anywhere in the argument list; it selects the
/// plural variant and is also available as `{{count}}`.
#[macro_export]
macro_rules! t {
    (@opts $opts:expr; count = $value:expr $(, $($rest:tt)*)?) => {
        $crate::t!(@opts $opts.count($value); $($($rest)*)?)
    };
    (@opts $opts:expr; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
        $crate::t!(@opts $opts.var(stringify!($name), $value); $($($rest)*)?)
    };
    (@opts $opts:expr;) => {
        $opts
    };
    ($tr:expr, $key:expr) => {
        $tr.t($key)
    };
    ($tr:expr, $key:expr, $($args:tt)+) => {
        $tr.t_with($key, &$crate::t!(@opts $crate::i18n::TOptions::new(); $($args)+))
    };
}

struct Inner {
    config: I18nConfig,
    language: RefCell<String>,
    loader: Rc<Loader>,
    planner: Planner,
}

/// Handle to the translation resource manager. Cloning is cheap and every
/// clone shares the same cache, loader and active language.
#[derive(Clone)]
pub struct I18n {
    inner: Rc<Inner>,
}

impl I18n {
    /// Build with a fresh cache sized from `config`.
    pub fn new(config: I18nConfig, fetcher: Rc<dyn Fetch>) -> Self {
        let cache = ResourceCache::shared(config.cache.capacity);
        Self::with_cache(config, fetcher, cache)
    }

    /// Build around an existing cache.
    pub fn with_cache(config: I18nConfig, fetcher: Rc<dyn Fetch>, cache: SharedCache) -> Self {
        let endpoint = Endpoint::new(resolve_base_url(&config.base_url));
        let loader = Rc::new(Loader::new(
            cache,
            fetcher,
            endpoint,
            config.retry.clone(),
            LoadStats::shared(),
        ));
        Self {
            inner: Rc::new(Inner {
                language: RefCell::new(config.default_language.clone()),
                planner: Planner::from_config(&config),
                config,
                loader,
            }),
        }
    }

    /// HTTP-backed instance with the bundled critical dictionaries
    /// pre-seeded, so the first render never waits on the network. Any
    /// resource the endpoint cannot serve is read from the bundle.
    pub fn with_http(config: I18nConfig) -> Self {
        let fetcher = FallbackFetcher::new(Rc::new(HttpFetcher::new()), Rc::new(BundledFetcher));
        let i18n = Self::new(config, Rc::new(fetcher));
        i18n.seed_bundled_critical();
        tracing::info!(
            platform = ?Platform::current(),
            base_url = %i18n.config().base_url,
            language = %i18n.language(),
            "i18n initialized"
        );
        i18n
    }

    /// Fully offline instance serving the embedded `locales/` tree.
    pub fn bundled(config: I18nConfig) -> Self {
        let i18n = Self::new(config, Rc::new(BundledFetcher));
        i18n.seed_bundled_critical();
        i18n
    }

    /// Put the embedded dictionaries of every critical namespace into the
    /// cache for each supported language and the fallback language.
    pub fn seed_bundled_critical(&self) {
        let config = &self.inner.config;
        let mut languages = config.supported_languages.clone();
        if !languages.contains(&config.fallback_language) {
            languages.push(config.fallback_language.clone());
        }
        let cache = self.inner.loader.cache();
        for language in &languages {
            for namespace in self.inner.planner.tiers().critical() {
                let Some(raw) = BundledLocales::read(language, namespace) else {
                    continue;
                };
                match Dictionary::from_json_str(&raw) {
                    Ok(dictionary) => {
                        cache.borrow_mut().set(language, namespace, &dictionary);
                    }
                    Err(err) => {
                        tracing::error!(language = %language, namespace = %namespace, %err, "bundled dictionary is invalid");
                    }
                }
            }
        }
    }

    /// Pick the starting language: stored preference, then the platform's
    /// requested languages, then the configured default.
    pub fn detect_language(&self) -> String {
        let supported = &self.inner.config.supported_languages;
        let stored = if self.inner.config.persist_language {
            storage::load_language_preference()
        } else {
            None
        };
        let detected = stored
            .and_then(|code| negotiate::match_supported(&code, supported))
            .unwrap_or_else(|| {
                negotiate::negotiate(
                    &negotiate::requested_languages(),
                    supported,
                    &self.inner.config.default_language,
                )
            });
        *self.inner.language.borrow_mut() = detected.clone();
        detected
    }

    pub fn config(&self) -> &I18nConfig {
        &self.inner.config
    }

    pub fn language(&self) -> String {
        self.inner.language.borrow().clone()
    }

    pub fn fallback_language(&self) -> String {
        self.inner.config.fallback_language.clone()
    }

    pub fn available_languages(&self) -> Vec<String> {
        self.inner.config.supported_languages.clone()
    }

    pub fn planner(&self) -> &Planner {
        &self.inner.planner
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.clone())
    }

    pub fn loader(&self) -> &Rc<Loader> {
        &self.inner.loader
    }

    /// A lookup function bound to `namespace`.
    pub fn translator(&self, namespace: &str) -> Translator {
        Translator {
            i18n: self.clone(),
            namespace: namespace.to_string(),
        }
    }

    /// Resolve a key in the first critical namespace (normally `common`)
    /// unless the key or `options` name another one.
    pub fn t(&self, key: &str, options: &TOptions) -> String {
        let default_namespace = self
            .inner
            .planner
            .tiers()
            .critical()
            .first()
            .map(String::as_str)
            .unwrap_or(scheduler::DEFAULT_NAMESPACE);
        self.translate_in(default_namespace, key, options)
    }

    fn translate_in(&self, bound_namespace: &str, key: &str, options: &TOptions) -> String {
        let default_namespace = options.namespace.as_deref().unwrap_or(bound_namespace);
        let (namespace, path) = translate::split_namespace(key, default_namespace);
        let language = self.language();
        let fallback = &self.inner.config.fallback_language;
        let cache = self.inner.loader.cache();

        let resolution = translate::resolve(&[language.as_str(), fallback.as_str()], path, options, |lang| {
            cache.borrow_mut().get(lang, namespace)
        });

        match resolution {
            Resolution::Found { text, .. } => translate::interpolate(&text, options),
            Resolution::Default(text) => text,
            Resolution::Missing => {
                if cfg!(debug_assertions) {
                    tracing::warn!(language = %language, namespace, key = path, "missing translation key");
                }
                key.to_string()
            }
        }
    }

    /// Load one namespace for one language (see [`Loader::load`]).
    pub fn load(&self, language: &str, namespace: &str) -> LocalBoxFuture<'static, Rc<Dictionary>> {
        self.inner.loader.load(language, namespace)
    }

    /// Load `namespace` for the active and the fallback language.
    pub fn load_namespace(&self, namespace: &str) -> impl Future<Output = ()> + 'static {
        let language = self.language();
        self.load_namespace_for(&language, namespace)
    }

    pub fn load_namespace_for(&self, language: &str, namespace: &str) -> impl Future<Output = ()> + 'static {
        let primary = self.load(language, namespace);
        let fallback_language = self.fallback_language();
        let fallback = (fallback_language != language).then(|| self.load(&fallback_language, namespace));
        async move {
            match fallback {
                Some(fallback) => {
                    futures::join!(primary, fallback);
                }
                None => {
                    primary.await;
                }
            }
        }
    }

    /// Switch the active language once its critical namespaces are loaded.
    /// Tags that do not parse as language identifiers are ignored; valid
    /// but unsupported tags go through the normal load path and end up on
    /// the fallback language.
    pub fn change_language(&self, code: &str) -> impl Future<Output = ()> + 'static {
        let this = self.clone();
        let code = code.to_string();
        async move {
            if negotiate::parse_tag(&code).is_none() {
                tracing::warn!(language = %code, "ignoring unparseable language tag");
                return;
            }
            let target = negotiate::match_supported(&code, &this.inner.config.supported_languages)
                .unwrap_or(code);
            this.scheduler().load_critical(&target).await;
            *this.inner.language.borrow_mut() = target.clone();
            if this.inner.config.persist_language {
                storage::save_language_preference(&target);
            }
            tracing::info!(language = %target, "language changed");
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        let loader = &self.inner.loader;
        let cache = loader.cache().borrow();
        loader.stats().borrow().snapshot(&cache)
    }

    /// Drop every cached dictionary (manual cache-busting).
    pub fn clear_cache(&self) {
        self.inner.loader.cache().borrow_mut().clear();
    }
}

impl PartialEq for I18n {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Key lookup bound to one namespace.
#[derive(Clone, PartialEq)]
pub struct Translator {
    i18n: I18n,
    namespace: String,
}

impl Translator {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn t(&self, key: &str) -> String {
        self.i18n.translate_in(&self.namespace, key, &TOptions::default())
    }

    pub fn t_with(&self, key: &str, options: &TOptions) -> String {
        self.i18n.translate_in(&self.namespace, key, options)
    }
}

/// Relative bases are resolved against the page origin on the web, where
/// the HTTP client needs absolute URLs.
fn resolve_base_url(base: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if base.starts_with('/') {
            if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
                return format!("{origin}{base}");
            }
        }
    }
    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::loader::tests::ScriptedFetcher;

    fn test_config() -> I18nConfig {
        I18nConfig {
            persist_language: false,
            retry: RetryPolicy::immediate(3),
            ..I18nConfig::default()
        }
    }

    #[test]
    fn fallback_language_is_bundled() {
        assert!(BundledLocales::languages().iter().any(|l| l == "en"));
    }

    #[test]
    fn basic_lookup_works() {
        let i18n = I18n::bundled(test_config());
        let tr = i18n.translator("common");
        assert_eq!(tr.t("nav.clients"), "Clienti");
        assert_eq!(t!(tr, "greeting", name = "Mario"), "Ciao, Mario");
    }

    #[tokio::test]
    async fn falls_back_to_english_when_key_missing() {
        let fetcher = ScriptedFetcher::new(
            vec![
                Ok(r#"{"errors":{}}"#.into()),
                Ok(r#"{"errors":{"timeout":"Request timed out"}}"#.into()),
            ],
            Err(LoadError::NotFound("x".into())),
        );
        let i18n = I18n::new(test_config(), fetcher);
        i18n.load_namespace("auth").await;

        let tr = i18n.translator("auth");
        assert_eq!(tr.t("errors.timeout"), "Request timed out");
        assert_eq!(
            tr.t_with("errors.unknown", &TOptions::new().default_value("Oops")),
            "Oops"
        );
        assert_eq!(tr.t("errors.unknown"), "errors.unknown");
    }

    #[test]
    fn default_value_is_returned_verbatim() {
        let i18n = I18n::bundled(test_config());
        let tr = i18n.translator("common");
        let options = TOptions::new().default_value("Hi {{name}}").var("name", "Mario");
        assert_eq!(tr.t_with("nope.missing", &options), "Hi {{name}}");
        assert_eq!(t!(tr, "greeting", name = "Mario"), "Ciao, Mario");
    }

    #[test]
    fn count_may_follow_other_arguments() {
        let i18n = I18n::bundled(test_config());
        let tr = i18n.translator("common");
        assert_eq!(t!(tr, "greeting", name = "Mario",), "Ciao, Mario");
        assert_eq!(
            t!(tr, "documents:count", name = "x", count = 3),
            t!(tr, "documents:count", count = 3, name = "x")
        );
    }

    #[tokio::test]
    async fn namespace_prefix_reaches_other_namespace() {
        let i18n = I18n::bundled(test_config());
        i18n.load_namespace("documents").await;
        let tr = i18n.translator("common");
        assert_eq!(tr.t("documents:types.invoice"), "Fattura");
        assert_eq!(t!(tr, "documents:count", count = 1), "1 documento");
        assert_eq!(t!(tr, "documents:count", count = 3), "3 documenti");
        assert_eq!(t!(tr, "documents:count", name = "x", count = 3), "3 documenti");
        assert_eq!(i18n.t("actions.save", &TOptions::new()), "Salva");
    }

    #[tokio::test]
    async fn dynamic_language_switch_ignores_bad_tags() {
        let i18n = I18n::bundled(test_config());
        let before = i18n.translator("common").t("nav.clients");
        i18n.change_language("!!").await;
        assert_eq!(i18n.language(), "it");
        assert_eq!(i18n.translator("common").t("nav.clients"), before);
    }

    #[tokio::test]
    async fn change_language_loads_critical_first() {
        let i18n = I18n::bundled(test_config());
        i18n.clear_cache();
        i18n.change_language("en-GB").await;
        assert_eq!(i18n.language(), "en");
        assert!(i18n.loader().cache().borrow().has("en", "common"));
        assert_eq!(i18n.translator("common").t("nav.clients"), "Clients");
    }

    #[tokio::test]
    async fn unsupported_language_falls_back_to_english() {
        let i18n = I18n::bundled(test_config());
        i18n.change_language("de").await;
        assert_eq!(i18n.language(), "de");
        assert_eq!(i18n.translator("common").t("nav.clients"), "Clients");
    }

    #[tokio::test]
    async fn load_twice_issues_one_request() {
        let fetcher = ScriptedFetcher::always(r#"{"title":"Articoli"}"#);
        let config = I18nConfig {
            fallback_language: "it".into(),
            ..test_config()
        };
        let i18n = I18n::new(config, fetcher.clone());
        i18n.load_namespace("items").await;
        i18n.load_namespace("items").await;
        assert_eq!(fetcher.requests.get(), 1);

        let stats = i18n.stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_size, 1);
        assert_eq!(stats.cache_capacity, 50);
    }

    #[tokio::test]
    async fn seeded_critical_namespaces_need_no_network() {
        let fetcher = ScriptedFetcher::failing();
        let i18n = I18n::new(test_config(), fetcher.clone());
        i18n.seed_bundled_critical();
        i18n.load_namespace("common").await;
        assert_eq!(fetcher.requests.get(), 0);
        assert_eq!(i18n.translator("common").t("app.name"), "Fatturino");
    }
}
