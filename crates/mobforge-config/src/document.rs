//! The in-memory configuration tree.
//!
//! A [`ConfigDocument`] is a tree of sections addressed by dotted paths
//! (`arenas.default.settings.world`). It behaves like the YAML stores
//! server admins are used to:
//!
//! - getters never fail, they fall back to a default,
//! - a missing intermediate section is the same as a missing value,
//! - setting a value creates any sections on the way to it,
//! - setting `null` deletes the value.
//!
//! Key order is preserved, so enumerating a section yields keys in the
//! order they were authored (registry insertion order depends on it).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigError;

/// A hierarchical, dotted-path configuration store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

/// Splits a dotted path, ignoring empty segments so `""` means the root.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Splits a path into its parent section path and final key.
fn split_last(path: &str) -> (&str, &str) {
    path.rsplit_once('.').unwrap_or(("", path))
}

/// Renders a scalar the way a YAML store's `getString` would.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ConfigDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value. `null` is treated as an empty document.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotASection`] if the value is neither an
    /// object nor `null`.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::new()),
            _ => Err(ConfigError::NotASection(String::new())),
        }
    }

    /// Returns the whole document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    // -- Raw access -------------------------------------------------------

    /// Looks up the value at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (parent, key) = split_last(path);
        if key.is_empty() {
            return None;
        }
        self.section(parent)?.get(key)
    }

    /// Returns `true` if any value (scalar, list, or section) exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Returns `true` if `path` names a section. The root is a section.
    pub fn is_section(&self, path: &str) -> bool {
        self.section(path).is_some()
    }

    /// Returns the section at `path`, or `None` if it is missing or not a
    /// section. The empty path is the root.
    pub fn section(&self, path: &str) -> Option<&Map<String, Value>> {
        let mut current = &self.root;
        for key in segments(path) {
            current = current.get(key)?.as_object()?;
        }
        Some(current)
    }

    /// Mutable variant of [`section`](Self::section).
    pub fn section_mut(&mut self, path: &str) -> Option<&mut Map<String, Value>> {
        let mut current = &mut self.root;
        for key in segments(path) {
            current = current.get_mut(key)?.as_object_mut()?;
        }
        Some(current)
    }

    /// Returns the section at `path`, creating it (and any missing
    /// parents) if needed. A scalar in the way is replaced by a section.
    pub fn make_section(&mut self, path: &str) -> &mut Map<String, Value> {
        let mut current = &mut self.root;
        for key in segments(path) {
            let entry = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry.as_object_mut().expect("just made a section");
        }
        current
    }

    /// Lists the immediate keys of the section at `path`, in order.
    /// Missing sections have no keys.
    pub fn keys(&self, path: &str) -> Vec<String> {
        self.section(path)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Sets the value at `path`, creating parent sections. Setting
    /// `Value::Null` removes the value instead.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        if value.is_null() {
            self.remove(path);
            return;
        }
        let (parent, key) = split_last(path);
        if key.is_empty() {
            return;
        }
        self.make_section(parent).insert(key.to_string(), value);
    }

    /// Removes and returns the value at `path`. Sibling order is kept.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (parent, key) = split_last(path);
        self.section_mut(parent)?.shift_remove(key)
    }

    // -- Typed getters ----------------------------------------------------

    /// Reads a boolean, or `default` if missing or not a boolean.
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Reads a scalar as a string. Numbers and booleans are rendered as
    /// text; lists and sections are `None`.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(scalar_string)
    }

    /// Reads a scalar as a string, or `default` if missing.
    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.get_string(path)
            .unwrap_or_else(|| default.to_string())
    }

    /// Reads a genuine list of scalars. Anything that is not a list is an
    /// empty list; non-scalar list entries are skipped.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(scalar_string).collect())
            .unwrap_or_default()
    }

    /// Reads a list, falling back to splitting a comma-separated scalar
    /// when there is no non-empty list at `path`.
    ///
    /// Entries are trimmed and empty entries are dropped, so
    /// `"stick, stone_sword,"` yields `["stick", "stone_sword"]`.
    pub fn get_list_or_split(&self, path: &str) -> Vec<String> {
        let mut entries = self.get_string_list(path);
        if entries.is_empty() {
            entries = self
                .get_string_or(path, "")
                .split(',')
                .map(str::to_string)
                .collect();
        }
        entries
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }
}
