//! Offline translation completeness check.
//!
//! Every dictionary is flattened to its dot-separated leaf keys and diffed
//! against the reference language's namespace of the same name. The check
//! never touches the runtime cache or loader; it is meant for CI.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use super::dictionary::Dictionary;
use super::error::CheckError;

/// `language -> namespace -> parsed dictionary (or the parse error)`.
pub type LocaleTree = BTreeMap<String, BTreeMap<String, Result<Dictionary, String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueKind {
    /// Present in the reference, absent in the target.
    MissingKey,
    /// A whole namespace file is absent for a language.
    MissingFile,
    /// A namespace file exists but is not a JSON object.
    InvalidFile,
    /// Present in the target, absent in the reference.
    ExtraKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Info,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::MissingKey | Self::MissingFile | Self::InvalidFile => Severity::Error,
            Self::ExtraKey => Severity::Info,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MissingKey => "missing-key",
            Self::MissingFile => "missing-file",
            Self::InvalidFile => "invalid-file",
            Self::ExtraKey => "extra-key",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Issue {
    pub kind: IssueKind,
    pub language: String,
    pub namespace: String,
    /// Leaf path for key issues; the parse error for `InvalidFile`.
    pub detail: Option<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}/{}", self.kind, self.language, self.namespace)?;
        match (&self.kind, &self.detail) {
            (IssueKind::InvalidFile, Some(detail)) => write!(f, ": {detail}"),
            (_, Some(detail)) => write!(f, " {detail}"),
            (_, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub reference: String,
    pub languages: Vec<String>,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.kind.severity() == Severity::Error)
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Categorized plain-text report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Translation completeness (reference: {}, checked: {})",
            self.reference,
            if self.languages.is_empty() {
                "none".to_string()
            } else {
                self.languages.join(", ")
            }
        );

        for kind in [
            IssueKind::MissingFile,
            IssueKind::InvalidFile,
            IssueKind::MissingKey,
            IssueKind::ExtraKey,
        ] {
            let count = self.count(kind);
            if count == 0 {
                continue;
            }
            let level = match kind.severity() {
                Severity::Error => "error",
                Severity::Info => "info",
            };
            let _ = writeln!(out, "\n{kind} ({level}, {count}):");
            for issue in self.of_kind(kind) {
                let _ = writeln!(out, "  {issue}");
            }
        }

        let errors = self
            .issues
            .iter()
            .filter(|issue| issue.kind.severity() == Severity::Error)
            .count();
        if errors == 0 {
            let _ = writeln!(out, "\nOK: no missing translations.");
        } else {
            let _ = writeln!(out, "\nFAILED: {errors} error-level issue(s).");
        }
        out
    }
}

/// Read `{dir}/{language}/{namespace}.json` into a tree. Files that fail to
/// parse are kept as errors so they can be reported.
pub fn read_locale_dir(dir: &Path) -> Result<LocaleTree, CheckError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| CheckError::Io { path, source }
    };

    let mut tree = LocaleTree::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let lang_dir = entry.path();
        if !lang_dir.is_dir() {
            continue;
        }
        let Some(language) = lang_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        let mut namespaces = BTreeMap::new();
        for file in fs::read_dir(&lang_dir).map_err(io_err(&lang_dir))? {
            let path = file.map_err(io_err(&lang_dir))?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw = fs::read_to_string(&path).map_err(io_err(&path))?;
            let parsed = Dictionary::from_json_str(&raw).map_err(|err| err.to_string());
            namespaces.insert(namespace.to_string(), parsed);
        }
        tree.insert(language.to_string(), namespaces);
    }
    Ok(tree)
}

/// Diff every language in `tree` against `reference`.
pub fn check(tree: &LocaleTree, reference: &str) -> Result<Report, CheckError> {
    let reference_namespaces = tree
        .get(reference)
        .filter(|namespaces| !namespaces.is_empty())
        .ok_or_else(|| CheckError::MissingReference(reference.to_string()))?;

    let mut report = Report {
        reference: reference.to_string(),
        languages: tree.keys().filter(|l| *l != reference).cloned().collect(),
        issues: Vec::new(),
    };

    let mut reference_keys: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for (namespace, parsed) in reference_namespaces {
        match parsed {
            Ok(dictionary) => {
                reference_keys.insert(namespace, dictionary.leaf_keys());
            }
            Err(err) => report.issues.push(Issue {
                kind: IssueKind::InvalidFile,
                language: reference.to_string(),
                namespace: namespace.clone(),
                detail: Some(err.clone()),
            }),
        }
    }

    for language in &report.languages {
        let namespaces = &tree[language];
        for (namespace, expected) in &reference_keys {
            let issue = |kind, detail| Issue {
                kind,
                language: language.clone(),
                namespace: namespace.to_string(),
                detail,
            };
            match namespaces.get(*namespace) {
                None => report.issues.push(issue(IssueKind::MissingFile, None)),
                Some(Err(err)) => report
                    .issues
                    .push(issue(IssueKind::InvalidFile, Some(err.clone()))),
                Some(Ok(dictionary)) => {
                    let actual = dictionary.leaf_keys();
                    for key in expected.difference(&actual) {
                        report.issues.push(issue(IssueKind::MissingKey, Some(key.clone())));
                    }
                    for key in actual.difference(expected) {
                        report.issues.push(issue(IssueKind::ExtraKey, Some(key.clone())));
                    }
                }
            }
        }
    }

    report.issues.sort();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(entries: &[(&str, &str, &str)]) -> LocaleTree {
        let mut tree = LocaleTree::new();
        for (lang, ns, json) in entries {
            tree.entry(lang.to_string())
                .or_default()
                .insert(ns.to_string(), Dictionary::from_json_str(json).map_err(|e| e.to_string()));
        }
        tree
    }

    #[test]
    fn reports_single_missing_key() {
        let tree = tree(&[
            ("en", "common", r#"{"a":{"b":"x","c":"y"}}"#),
            ("it", "common", r#"{"a":{"b":"z"}}"#),
        ]);
        let report = check(&tree, "en").unwrap();
        assert_eq!(report.count(IssueKind::MissingKey), 1);
        assert_eq!(report.count(IssueKind::ExtraKey), 0);
        assert_eq!(report.count(IssueKind::MissingFile), 0);
        let issue = report.of_kind(IssueKind::MissingKey).next().unwrap();
        assert_eq!(issue.detail.as_deref(), Some("a.c"));
        assert_eq!(issue.language, "it");
        assert!(report.has_errors());
    }

    #[test]
    fn extra_keys_are_informational() {
        let tree = tree(&[
            ("en", "common", r#"{"a":"x"}"#),
            ("it", "common", r#"{"a":"x","b":"y"}"#),
        ]);
        let report = check(&tree, "en").unwrap();
        assert_eq!(report.count(IssueKind::ExtraKey), 1);
        assert!(!report.has_errors());
        assert!(report.render().contains("OK: no missing translations."));
    }

    #[test]
    fn missing_and_invalid_files_are_errors() {
        let tree = tree(&[
            ("en", "common", r#"{"a":"x"}"#),
            ("en", "auth", r#"{"b":"y"}"#),
            ("it", "common", "[]"),
        ]);
        let report = check(&tree, "en").unwrap();
        assert_eq!(report.count(IssueKind::MissingFile), 1);
        assert_eq!(report.count(IssueKind::InvalidFile), 1);
        let rendered = report.render();
        assert!(rendered.contains("missing-file (error, 1):"));
        assert!(rendered.contains("[missing-file] it/auth"));
        assert!(rendered.contains("FAILED: 2 error-level issue(s)."));
    }

    #[test]
    fn absent_reference_is_an_error() {
        let tree = tree(&[("it", "common", r#"{"a":"x"}"#)]);
        assert!(matches!(check(&tree, "en"), Err(CheckError::MissingReference(_))));
    }

    #[test]
    fn reads_directory_layout() {
        let dir = tempfile::tempdir().unwrap();
        for (lang, ns, body) in [
            ("en", "common", r#"{"a":{"b":"x","c":"y"}}"#),
            ("it", "common", r#"{"a":{"b":"z"}}"#),
            ("it", "notes", "not json"),
        ] {
            let lang_dir = dir.path().join(lang);
            fs::create_dir_all(&lang_dir).unwrap();
            fs::write(lang_dir.join(format!("{ns}.json")), body).unwrap();
        }
        fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let tree = read_locale_dir(dir.path()).unwrap();
        assert_eq!(tree.len(), 2);
        assert!(tree["it"]["notes"].is_err());

        let report = check(&tree, "en").unwrap();
        assert_eq!(report.languages, vec!["it".to_string()]);
        assert_eq!(report.count(IssueKind::MissingKey), 1);
    }
}
