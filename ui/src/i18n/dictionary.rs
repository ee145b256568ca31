//! Nested string dictionaries for one (language, namespace) pair.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::LoadError;

/// A tree of translated strings addressed by dot-separated paths
/// (`stats.totalClients`). Only string leaves resolve; other JSON values
/// are carried but ignored by lookup and flattening.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(Map<String, Value>);

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON payload; the root must be an object.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(err) => Err(LoadError::Malformed(err.to_string())),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(LoadError::Malformed(format!(
                "expected a JSON object at the root, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Resolve a dot-separated path to a string leaf.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        current.as_str()
    }

    /// Insert (or replace) a string leaf, creating intermediate objects.
    /// An intermediate string leaf in the way is replaced by an object.
    pub fn insert(&mut self, path: &str, value: impl Into<String>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };
        let mut current = &mut self.0;
        for segment in segments {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        current.insert(last.to_string(), Value::String(value.into()));
    }

    /// Every string leaf keyed by its full dot-separated path.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        flatten_into(&self.0, "", &mut out);
        out
    }

    pub fn leaf_keys(&self) -> BTreeSet<String> {
        self.flatten().into_keys().collect()
    }
}

impl From<Map<String, Value>> for Dictionary {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(s) => {
                out.insert(path, s.clone());
            }
            Value::Object(child) => flatten_into(child, &path, out),
            _ => {}
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
