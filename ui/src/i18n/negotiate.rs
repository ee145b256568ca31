//! Choosing the UI language from what the platform requests.

use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use unic_langid::LanguageIdentifier;

/// Languages requested by the user agent / OS, most preferred first.
#[cfg(target_arch = "wasm32")]
pub fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

/// Parse a BCP 47 tag, accepting POSIX-style `_` separators (`en_GB`).
pub fn parse_tag(tag: &str) -> Option<LanguageIdentifier> {
    tag.replace('_', "-").parse().ok()
}

/// Match one language tag against `supported` (`it-IT` -> `it`).
/// Unparseable tags never match.
pub fn match_supported(tag: &str, supported: &[String]) -> Option<String> {
    let requested = parse_tag(tag)?;
    best_match(&[requested], supported)
}

/// Best supported language for `requested`, else `default`.
pub fn negotiate(requested: &[LanguageIdentifier], supported: &[String], default: &str) -> String {
    best_match(requested, supported).unwrap_or_else(|| default.to_string())
}

/// Filtering negotiation keeps the caller's preference order, so the first
/// result is the best match. The configured spelling of the tag is returned.
fn best_match(requested: &[LanguageIdentifier], supported: &[String]) -> Option<String> {
    let (tags, available): (Vec<&String>, Vec<LanguageIdentifier>) = supported
        .iter()
        .filter_map(|tag| parse_tag(tag).map(|id| (tag, id)))
        .unzip();
    let chosen = negotiate_languages(requested, available.as_slice(), None, NegotiationStrategy::Filtering);
    let first = *chosen.first()?;
    available
        .iter()
        .position(|id| id == first)
        .map(|index| tags[index].clone())
}
