//! Shared UI crate for Fatturino: the translation resource manager and the
//! components built on it.

pub mod core;
pub mod i18n;

pub mod components {
    // Language picker bound to the i18n context (components/language_switcher.rs)
    pub mod language_switcher;
    pub use language_switcher::LanguageSwitcher;
}
