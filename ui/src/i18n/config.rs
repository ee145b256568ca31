//! Configuration for the translation resource manager.
//!
//! The shipped configuration lives in `ui/i18n.toml` and is embedded at
//! compile time. Every field has a default, so a partial file (or none)
//! still produces a working setup.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::error::ConfigError;
use super::loader::RetryPolicy;

const EMBEDDED_CONFIG: &str = include_str!("../../i18n.toml");

static BUNDLED: Lazy<I18nConfig> = Lazy::new(|| match I18nConfig::from_toml_str(EMBEDDED_CONFIG) {
    Ok(config) => config,
    Err(err) => {
        tracing::error!(%err, "embedded i18n.toml rejected; using built-in defaults");
        I18nConfig::default()
    }
});

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_language: String,
    pub fallback_language: String,
    pub supported_languages: Vec<String>,
    /// Root under which `{language}/{namespace}.json` is served.
    pub base_url: String,
    /// Remember the last language chosen with `change_language`.
    pub persist_language: bool,
    pub cache: CacheConfig,
    pub retry: RetryPolicy,
    pub preload: PreloadConfig,
    pub namespaces: NamespaceConfig,
    /// Route path -> namespaces the view needs.
    pub routes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    /// Stagger applied before medium/low tier loads so they do not
    /// contend with the first paint.
    pub on_demand_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub critical: Vec<String>,
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl I18nConfig {
    /// The configuration embedded from `ui/i18n.toml`.
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be at least 1".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        if !self.retry.base.is_finite() || self.retry.base < 1.0 {
            return Err(ConfigError::Invalid("retry.base must be a finite number >= 1".into()));
        }
        if self.default_language.trim().is_empty() || self.fallback_language.trim().is_empty() {
            return Err(ConfigError::Invalid("language codes must not be empty".into()));
        }
        if !self.supported_languages.contains(&self.default_language) {
            return Err(ConfigError::Invalid(format!(
                "default_language `{}` is not listed in supported_languages",
                self.default_language
            )));
        }
        Ok(())
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: "it".to_string(),
            fallback_language: "en".to_string(),
            supported_languages: vec!["it".to_string(), "en".to_string()],
            base_url: "/locales".to_string(),
            persist_language: true,
            cache: CacheConfig::default(),
            retry: RetryPolicy::default(),
            preload: PreloadConfig::default(),
            namespaces: NamespaceConfig::default(),
            routes: BTreeMap::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            on_demand_delay_ms: 100,
        }
    }
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            critical: vec!["common".to_string()],
            high: Vec::new(),
            medium: Vec::new(),
            low: Vec::new(),
        }
    }
}
