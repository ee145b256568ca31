//! Cardinal plural categories and their dictionary key suffixes.
//!
//! Categories come from the CLDR rules in `intl_pluralrules`. Languages
//! without CLDR data use `one` for exactly 1 and `other` for the rest.

use std::cell::RefCell;
use std::collections::HashMap;

use intl_pluralrules::{PluralCategory as CldrCategory, PluralRuleType, PluralRules};
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// Suffix appended to a key to select this variant (`count_one`).
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl From<CldrCategory> for PluralCategory {
    fn from(category: CldrCategory) -> Self {
        match category {
            CldrCategory::ZERO => Self::Zero,
            CldrCategory::ONE => Self::One,
            CldrCategory::TWO => Self::Two,
            CldrCategory::FEW => Self::Few,
            CldrCategory::MANY => Self::Many,
            CldrCategory::OTHER => Self::Other,
        }
    }
}

thread_local! {
    // Keyed by the tag as passed in; `None` records a language without rules.
    static RULES: RefCell<HashMap<String, Option<PluralRules>>> = RefCell::new(HashMap::new());
}

/// Rules for the full tag, else for its primary language subtag.
fn rules_for(language: &str) -> Option<PluralRules> {
    let id: LanguageIdentifier = language.replace('_', "-").parse().ok()?;
    let primary = LanguageIdentifier::from_parts(id.language, None, None, &[]);
    PluralRules::create(id, PluralRuleType::CARDINAL)
        .or_else(|_| PluralRules::create(primary, PluralRuleType::CARDINAL))
        .ok()
}

/// Plural category for `count` in `language`.
pub fn category(language: &str, count: i64) -> PluralCategory {
    RULES.with(|rules| {
        let mut rules = rules.borrow_mut();
        let entry = rules.entry(language.to_string()).or_insert_with(|| {
            let found = rules_for(language);
            if found.is_none() {
                tracing::debug!(language, "no plural rules for language, using one/other");
            }
            found
        });
        match entry.as_ref().and_then(|r| r.select(count).ok()) {
            Some(category) => category.into(),
            None if count == 1 => PluralCategory::One,
            None => PluralCategory::Other,
        }
    })
}
