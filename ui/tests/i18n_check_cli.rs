//! Runs the `i18n-check` binary against small locale trees and checks its
//! exit status and report.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn i18n_check_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_i18n-check"))
}

fn write_locale(root: &Path, language: &str, namespace: &str, json: &str) {
    let dir = root.join(language);
    fs::create_dir_all(&dir).expect("create language dir");
    fs::write(dir.join(format!("{namespace}.json")), json).expect("write dictionary");
}

fn run(args: &[&str]) -> Output {
    Command::new(i18n_check_bin())
        .args(args)
        .output()
        .expect("run i18n-check")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn shipped_locales_pass() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn complete_tree_exits_zero() {
    let root = tempfile::tempdir().expect("tempdir");
    write_locale(root.path(), "en", "common", r#"{"app":{"name":"Fatturino"}}"#);
    write_locale(root.path(), "it", "common", r#"{"app":{"name":"Fatturino"}}"#);

    let output = run(&[&path_arg(root.path())]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "{stdout}");
    assert!(stdout.contains("OK: no missing translations."));
}

#[test]
fn missing_key_exits_one() {
    let root = tempfile::tempdir().expect("tempdir");
    write_locale(root.path(), "en", "common", r#"{"app":{"name":"Fatturino","tagline":"Invoices"}}"#);
    write_locale(root.path(), "it", "common", r#"{"app":{"name":"Fatturino"}}"#);

    let output = run(&[&path_arg(root.path())]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("app.tagline"), "{stdout}");
    assert!(stdout.contains("FAILED"));
}

#[test]
fn reference_language_can_be_chosen() {
    let root = tempfile::tempdir().expect("tempdir");
    write_locale(root.path(), "en", "common", r#"{"app":{"name":"Fatturino"}}"#);
    write_locale(root.path(), "it", "common", r#"{"app":{"name":"Fatturino","tagline":"Fatture"}}"#);

    let dir = path_arg(root.path());
    assert_eq!(run(&[&dir]).status.code(), Some(0));
    assert_eq!(run(&[&dir, "--reference", "it"]).status.code(), Some(1));
}

#[test]
fn unreadable_tree_exits_two() {
    let root = tempfile::tempdir().expect("tempdir");
    let missing_dir = root.path().join("nowhere");
    let output = run(&[&path_arg(&missing_dir)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("i18n-check:"));

    write_locale(root.path(), "it", "common", r#"{"app":{"name":"Fatturino"}}"#);
    let output = run(&[&path_arg(root.path())]);
    assert_eq!(output.status.code(), Some(2));
}
