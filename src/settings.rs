//! Flat plugin settings as submitted by the host's settings form.
//!
//! The host stores plugin settings as a flat mapping of string keys to either
//! a single string or a list of strings. Dynamic form rows use array-suffixed
//! keys (`division_0_type[]`), which a form body submits once per row.
//!
//! # Example
//!
//! ```
//! use nodered_display::Settings;
//!
//! let settings = Settings::from_form(
//!     "pageTitle=Garden&division_0_type%5B%5D=title&division_0_type%5B%5D=dataoutput",
//! );
//!
//! assert_eq!(settings.get_str("pageTitle"), Some("Garden"));
//! assert_eq!(settings.get("division_0_type[]").unwrap().values().len(), 2);
//! ```

use std::collections::btree_map::{self, BTreeMap};
#[cfg(feature = "yaml")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// A single settings value: one string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Plain form field
    Single(String),
    /// Repeated (array-suffixed) form field
    List(Vec<String>),
}

impl SettingValue {
    /// First value, used for scalar settings.
    pub fn first(&self) -> Option<&str> {
        match self {
            SettingValue::Single(value) => Some(value),
            SettingValue::List(values) => values.first().map(String::as_str),
        }
    }

    /// All values in submission order. A single value is a one-element slice.
    pub fn values(&self) -> &[String] {
        match self {
            SettingValue::Single(value) => std::slice::from_ref(value),
            SettingValue::List(values) => values,
        }
    }

    /// Append a value, promoting a single value to a list.
    pub fn push(&mut self, value: String) {
        match self {
            SettingValue::List(values) => values.push(value),
            SettingValue::Single(existing) => {
                let existing = std::mem::take(existing);
                *self = SettingValue::List(vec![existing, value]);
            }
        }
    }

    /// Convert a JSON value. Nulls are dropped, scalars are stringified.
    fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                SettingValue::List(items.into_iter().filter_map(json_scalar_text).collect())
            }
            other => match json_scalar_text(other) {
                Some(text) => SettingValue::Single(text),
                None => SettingValue::List(Vec::new()),
            },
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Single(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Single(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(values: Vec<String>) -> Self {
        SettingValue::List(values)
    }
}

impl From<Vec<&str>> for SettingValue {
    fn from(values: Vec<&str>) -> Self {
        SettingValue::List(values.into_iter().map(str::to_string).collect())
    }
}

fn json_scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Flat settings mapping, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: BTreeMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty settings mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    /// Look up a scalar value (first element for lists).
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(SettingValue::first)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, SettingValue> {
        self.entries.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a `application/x-www-form-urlencoded` body or query string.
    ///
    /// Keys ending in `[]` accumulate every occurrence into a list.
    /// Other keys keep the last submitted value.
    pub fn from_form(body: &str) -> Self {
        let mut settings = Settings::new();
        for (key, value) in form_urlencoded::parse(body.as_bytes()) {
            let value = value.into_owned();
            if key.ends_with("[]") {
                settings
                    .entries
                    .entry(key.into_owned())
                    .or_insert_with(|| SettingValue::List(Vec::new()))
                    .push(value);
            } else {
                settings
                    .entries
                    .insert(key.into_owned(), SettingValue::Single(value));
            }
        }
        settings
    }

    /// Build settings from an already-parsed JSON value.
    ///
    /// The value must be an object. Numbers and booleans are stringified and
    /// nulls are dropped.
    pub fn from_json_value(value: Value) -> Result<Self, Error> {
        let Value::Object(map) = value else {
            return Err(Error::Serialization(
                "settings must be an object".to_string(),
            ));
        };
        let entries = map
            .into_iter()
            .map(|(key, value)| (key, SettingValue::from_json(value)))
            .collect();
        Ok(Self { entries })
    }

    /// Parse settings from a JSON object string.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Parse settings from a YAML mapping.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Serialization(format!("Invalid settings YAML: {}", e)))?;
        Self::from_json_value(value)
    }

    /// Load settings from a YAML (or JSON) file.
    #[cfg(feature = "yaml")]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read settings file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }
}

impl<K, V> FromIterator<(K, V)> for Settings
where
    K: Into<String>,
    V: Into<SettingValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Settings::new();
        for (key, value) in iter {
            settings.insert(key, value);
        }
        settings
    }
}

impl<'a> IntoIterator for &'a Settings {
    type Item = (&'a String, &'a SettingValue);
    type IntoIter = btree_map::Iter<'a, String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
