//! Build script: generates typed key constants from the reference
//! dictionaries in `locales/en/`.
//!
//! Each `locales/en/<namespace>.json` becomes `keys::<namespace>` with a
//! `NAMESPACE` constant, one constant per leaf key (plural suffixes
//! collapsed, so `count_one`/`count_other` yield a single `COUNT`) and an
//! `ALL` slice. A key removed from the reference stops compiling wherever
//! it is still used.

use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

const REFERENCE_LANGUAGE: &str = "en";
const PLURAL_SUFFIXES: &[&str] = &["_zero", "_one", "_two", "_few", "_many", "_other"];

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let reference_dir = manifest_dir.join("locales").join(REFERENCE_LANGUAGE);
    println!("cargo:rerun-if-changed=locales");
    println!("cargo:rerun-if-changed={}", reference_dir.display());

    let mut namespaces: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Ok(entries) = fs::read_dir(&reference_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            println!("cargo:rerun-if-changed={}", path.display());
            let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            namespaces.insert(namespace.to_string(), read_keys(&path));
        }
    } else {
        println!(
            "cargo:warning=no reference dictionaries at {}; generating empty key modules",
            reference_dir.display()
        );
    }

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo")).join("keys.rs");
    fs::write(&out, render(&namespaces)).expect("failed to write generated keys.rs");
}

fn read_keys(path: &Path) -> Vec<String> {
    let raw = fs::read_to_string(path).unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
    let value: Value =
        serde_json::from_str(&raw).unwrap_or_else(|err| panic!("{} is not valid JSON: {err}", path.display()));
    let mut keys = Vec::new();
    flatten(&value, "", &mut keys);
    keys
}

fn flatten(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, &path, out);
            }
        }
        _ if !prefix.is_empty() => out.push(prefix.to_string()),
        _ => {}
    }
}

fn strip_plural(key: &str) -> &str {
    PLURAL_SUFFIXES
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))
        .unwrap_or(key)
}

/// `stats.totalClients` -> `STATS_TOTAL_CLIENTS`.
fn const_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            name.push('_');
        }
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_uppercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !name.ends_with('_') {
                name.push('_');
            }
            prev_lower = false;
        }
    }
    let name = name.trim_matches('_').to_string();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("K_{name}")
    } else {
        name
    }
}

fn module_name(namespace: &str) -> String {
    let name: String = namespace
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    match name.as_str() {
        "" => "_".to_string(),
        "self" | "super" | "crate" | "type" | "mod" | "use" | "fn" | "impl" => format!("r#{name}"),
        _ if name.starts_with(|c: char| c.is_ascii_digit()) => format!("ns_{name}"),
        _ => name,
    }
}

fn render(namespaces: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::from("// @generated by build.rs from locales/en. Do not edit.\n\n");
    for (namespace, keys) in namespaces {
        let mut constants: BTreeMap<String, String> = BTreeMap::new();
        for key in keys {
            let base = strip_plural(key);
            let name = const_name(base);
            if name.is_empty() {
                continue;
            }
            if name == "NAMESPACE" || name == "ALL" {
                println!("cargo:warning={namespace}: key `{base}` clashes with a reserved constant; skipped");
                continue;
            }
            match constants.get(&name) {
                Some(existing) if existing != base => {
                    println!("cargo:warning={namespace}: `{base}` and `{existing}` both map to {name}; keeping `{existing}`");
                }
                Some(_) => {}
                None => {
                    constants.insert(name, base.to_string());
                }
            }
        }

        let _ = writeln!(out, "pub mod {} {{", module_name(namespace));
        let _ = writeln!(out, "    pub const NAMESPACE: &str = {namespace:?};");
        for (name, key) in &constants {
            let _ = writeln!(out, "    pub const {name}: &str = {key:?};");
        }
        let _ = writeln!(out, "    pub const ALL: &[&str] = &[");
        for name in constants.keys() {
            let _ = writeln!(out, "        {name},");
        }
        let _ = writeln!(out, "    ];");
        let _ = writeln!(out, "}}\n");
    }
    out
}
