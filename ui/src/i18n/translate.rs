//! Key resolution: variant selection, the language fallback chain and
//! `{{name}}` interpolation.
//!
//! Resolution order for one call:
//! 1. the active language's dictionary for the namespace,
//! 2. the fallback language's dictionary,
//! 3. the caller's `default_value`,
//! 4. the raw key.
//!
//! Within a dictionary the most specific variant wins:
//! `key_{context}_{plural}`, `key_{context}`, `key_{plural}`, `key_other`,
//! `key`. The `key_other` step covers dictionaries that only carry the
//! `one`/`other` pair for a language with more categories.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::rc::Rc;

use super::dictionary::Dictionary;
use super::plural;

/// Separates an explicit namespace from the key path (`auth:errors.timeout`).
pub const NS_SEPARATOR: char = ':';

/// Per-call lookup options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TOptions {
    pub count: Option<i64>,
    pub context: Option<String>,
    pub default_value: Option<String>,
    pub namespace: Option<String>,
    pub vars: BTreeMap<String, String>,
}

impl TOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a plural variant; also available as `{{count}}`.
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn var(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.vars.insert(name.into(), value.to_string());
        self
    }
}

/// Where a lookup ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { language: String, text: String },
    Default(String),
    Missing,
}

/// Split `ns:key` into `(ns, key)`; keys without a separator use
/// `default_namespace`.
pub fn split_namespace<'a>(key: &'a str, default_namespace: &'a str) -> (&'a str, &'a str) {
    match key.split_once(NS_SEPARATOR) {
        Some((ns, rest)) if is_namespace_name(ns) && !rest.is_empty() => (ns, rest),
        _ => (default_namespace, key),
    }
}

fn is_namespace_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Candidate keys from most to least specific.
pub fn variant_keys(key: &str, language: &str, options: &TOptions) -> Vec<String> {
    let plural = options
        .count
        .map(|count| plural::category(language, count).suffix());
    let mut candidates = Vec::with_capacity(5);
    if let Some(context) = options.context.as_deref().filter(|c| !c.is_empty()) {
        if let Some(suffix) = plural {
            candidates.push(format!("{key}_{context}_{suffix}"));
        }
        candidates.push(format!("{key}_{context}"));
    }
    if let Some(suffix) = plural {
        candidates.push(format!("{key}_{suffix}"));
        if suffix != "other" {
            candidates.push(format!("{key}_other"));
        }
    }
    candidates.push(key.to_string());
    candidates
}

/// Walk the language chain. `dictionary_for(language)` returns the loaded
/// dictionary for the namespace in that language, if any.
pub fn resolve<F>(languages: &[&str], key: &str, options: &TOptions, mut dictionary_for: F) -> Resolution
where
    F: FnMut(&str) -> Option<Rc<Dictionary>>,
{
    for (index, language) in languages.iter().enumerate() {
        if languages[..index].contains(language) {
            continue;
        }
        let Some(dictionary) = dictionary_for(language) else {
            continue;
        };
        for candidate in variant_keys(key, language, options) {
            if let Some(text) = dictionary.lookup(&candidate) {
                return Resolution::Found {
                    language: language.to_string(),
                    text: text.to_string(),
                };
            }
        }
    }
    match &options.default_value {
        Some(value) => Resolution::Default(value.clone()),
        None => Resolution::Missing,
    }
}

/// Substitute `{{name}}` tokens. `count` is implied by `options.count`.
/// Unknown tokens are left as written.
pub fn interpolate(template: &str, options: &TOptions) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = after_open[..close].trim();
        match lookup_var(name, options) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }
    out.push_str(rest);
    out
}

fn lookup_var(name: &str, options: &TOptions) -> Option<String> {
    if let Some(value) = options.vars.get(name) {
        return Some(value.clone());
    }
    match (name, options.count) {
        ("count", Some(count)) => Some(count.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(json: &str) -> Rc<Dictionary> {
        Rc::new(Dictionary::from_json_str(json).unwrap())
    }

    #[test]
    fn namespace_prefix_overrides_default() {
        assert_eq!(split_namespace("auth:errors.timeout", "common"), ("auth", "errors.timeout"));
        assert_eq!(split_namespace("errors.timeout", "common"), ("common", "errors.timeout"));
        assert_eq!(split_namespace("at 12:00", "common"), ("common", "at 12:00"));
        assert_eq!(split_namespace("auth:", "common"), ("common", "auth:"));
    }

    #[test]
    fn variant_order_is_most_specific_first() {
        let opts = TOptions::new().count(2).context("formal");
        assert_eq!(
            variant_keys("greeting", "it", &opts),
            vec!["greeting_formal_other", "greeting_formal", "greeting_other", "greeting"]
        );
        assert_eq!(variant_keys("title", "it", &TOptions::new()), vec!["title"]);
        assert_eq!(
            variant_keys("count", "ru", &TOptions::new().count(3)),
            vec!["count_few", "count_other", "count"]
        );
    }

    #[test]
    fn missing_category_variant_uses_other() {
        let ru = dict(r#"{"count_one":"{{count}} документ","count_few":"{{count}} документа","count_other":"{{count}} документов"}"#);
        let render = |count| {
            let opts = TOptions::new().count(count);
            match resolve(&["ru"], "count", &opts, |_| Some(ru.clone())) {
                Resolution::Found { text, .. } => interpolate(&text, &opts),
                other => panic!("unexpected {other:?}"),
            }
        };
        assert_eq!(render(1), "1 документ");
        assert_eq!(render(3), "3 документа");
        assert_eq!(render(5), "5 документов");
    }

    #[test]
    fn plural_variants_follow_language_rules() {
        let it = dict(r#"{"count_one":"{{count}} documento","count_other":"{{count}} documenti"}"#);
        let render = |count| {
            let opts = TOptions::new().count(count);
            match resolve(&["it"], "count", &opts, |_| Some(it.clone())) {
                Resolution::Found { text, .. } => interpolate(&text, &opts),
                other => panic!("unexpected {other:?}"),
            }
        };
        assert_eq!(render(1), "1 documento");
        assert_eq!(render(3), "3 documenti");
        assert_eq!(render(0), "0 documenti");
        assert_eq!(render(2), "2 documenti");
    }

    #[test]
    fn context_variant_falls_back_to_base_key() {
        let d = dict(r#"{"greeting":"Ciao","greeting_formal":"Buongiorno"}"#);
        let formal = resolve(&["it"], "greeting", &TOptions::new().context("formal"), |_| Some(d.clone()));
        let casual = resolve(&["it"], "greeting", &TOptions::new().context("pirate"), |_| Some(d.clone()));
        assert!(matches!(formal, Resolution::Found { text, .. } if text == "Buongiorno"));
        assert!(matches!(casual, Resolution::Found { text, .. } if text == "Ciao"));
    }

    #[test]
    fn falls_back_to_second_language() {
        let it = dict(r#"{"errors":{}}"#);
        let en = dict(r#"{"errors":{"timeout":"Request timed out"}}"#);
        let outcome = resolve(&["it", "en"], "errors.timeout", &TOptions::new(), |lang| {
            Some(if lang == "it" { it.clone() } else { en.clone() })
        });
        assert_eq!(
            outcome,
            Resolution::Found {
                language: "en".into(),
                text: "Request timed out".into()
            }
        );
    }

    #[test]
    fn default_value_then_missing() {
        let empty = dict("{}");
        let with_default = resolve(&["it", "en"], "nope", &TOptions::new().default_value("Nope"), |_| {
            Some(empty.clone())
        });
        assert_eq!(with_default, Resolution::Default("Nope".into()));
        assert_eq!(resolve(&["it"], "nope", &TOptions::new(), |_| None), Resolution::Missing);
    }

    #[test]
    fn duplicate_languages_are_consulted_once() {
        let mut calls = 0;
        resolve(&["en", "en"], "x", &TOptions::new(), |_| {
            calls += 1;
            None
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn interpolation_replaces_known_tokens_only() {
        let opts = TOptions::new().var("name", "Mario").count(4);
        assert_eq!(interpolate("Ciao, {{name}}", &opts), "Ciao, Mario");
        assert_eq!(interpolate("{{ name }} ha {{count}} fatture", &opts), "Mario ha 4 fatture");
        assert_eq!(interpolate("Invia a {{client}}", &opts), "Invia a {{client}}");
        assert_eq!(interpolate("aperta {{name", &opts), "aperta {{name");
        assert_eq!(interpolate("nessun token", &opts), "nessun token");
    }
}
