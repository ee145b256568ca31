//! Error types for the translation resource manager.
//!
//! `LoadError` never crosses the public `load`/`t` surface: the loader
//! logs it and degrades to an empty dictionary. `ConfigError` and
//! `CheckError` are ordinary `Result` errors for setup and tooling.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single attempt to fetch a namespace failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("malformed dictionary: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid i18n config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid i18n config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("cannot read locale directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reference language `{0}` has no namespaces")]
    MissingReference(String),
}
