//! Pluggable key/value configuration providers
//!
//! A provider answers lookups with an explicit presence (`Option`) and keeps a
//! defaults layer that is consulted when a key has no configured value.

use std::collections::HashMap;

use parking_lot::RwLock;

/// A scalar or list configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
    List(Vec<String>),
}

impl ConfigValue {
    /// Read the value as a boolean, casting string forms such as `"true"` or `"1"`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::String(s) => parse_bool(s),
            ConfigValue::List(_) => None,
        }
    }

    /// Read the value as a string. Lists are comma-joined.
    pub fn as_string(&self) -> String {
        match self {
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::String(s) => s.clone(),
            ConfigValue::List(items) => items.join(","),
        }
    }

    /// Read the value as a list. Strings are split on commas.
    /// Items are trimmed and empty items dropped, whatever the form
    pub fn as_string_slice(&self) -> Vec<String> {
        match self {
            ConfigValue::Bool(b) => vec![b.to_string()],
            ConfigValue::String(s) => normalize_items(s.split(',')),
            ConfigValue::List(items) => normalize_items(items.iter().map(String::as_str)),
        }
    }

    /// An empty string, which never shadows a registered default
    pub fn is_blank(&self) -> bool {
        matches!(self, ConfigValue::String(s) if s.is_empty())
    }
}

fn normalize_items<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prefer an explicit value, falling back to the default when the explicit
/// value is missing or blank
pub(crate) fn layered(
    explicit: Option<ConfigValue>,
    default: impl FnOnce() -> Option<ConfigValue>,
) -> Option<ConfigValue> {
    match explicit {
        Some(value) if !value.is_blank() => Some(value),
        explicit => default().or(explicit),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        ConfigValue::List(value)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(value: Vec<&str>) -> Self {
        ConfigValue::List(value.into_iter().map(|s| s.to_string()).collect())
    }
}

/// Key/value configuration backend
///
/// Implementations must answer every key; unknown keys yield `None` and
/// never an error.
pub trait ConfigProvider: Send + Sync {
    /// Look up a value, falling back to a registered default
    fn lookup(&self, key: &str) -> Option<ConfigValue>;

    /// Whether the key has an explicitly configured value (defaults do not count)
    fn is_set(&self, key: &str) -> bool;

    /// Register a default value used when the key has no configured value
    fn set_default(&self, key: &str, value: ConfigValue);

    fn lookup_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key).and_then(|v| v.as_bool())
    }

    fn lookup_string(&self, key: &str) -> Option<String> {
        self.lookup(key).map(|v| v.as_string())
    }

    fn lookup_string_slice(&self, key: &str) -> Option<Vec<String>> {
        self.lookup(key).map(|v| v.as_string_slice())
    }
}

/// Provider bound before any real configuration is loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyProvider;

impl ConfigProvider for EmptyProvider {
    fn lookup(&self, _key: &str) -> Option<ConfigValue> {
        None
    }

    fn is_set(&self, _key: &str) -> bool {
        false
    }

    fn set_default(&self, _key: &str, _value: ConfigValue) {}
}

/// In-memory provider with an explicit values layer and a defaults layer
#[derive(Debug, Default)]
pub struct MemoryProvider {
    values: RwLock<HashMap<String, ConfigValue>>,
    defaults: RwLock<HashMap<String, ConfigValue>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`MemoryProvider::set`]
    pub fn with(self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an explicit value
    pub fn set(&self, key: &str, value: impl Into<ConfigValue>) {
        self.values.write().insert(key.to_string(), value.into());
    }

    /// Remove an explicit value, leaving any default in place
    pub fn unset(&self, key: &str) -> Option<ConfigValue> {
        self.values.write().remove(key)
    }
}

impl ConfigProvider for MemoryProvider {
    fn lookup(&self, key: &str) -> Option<ConfigValue> {
        let explicit = self.values.read().get(key).cloned();
        layered(explicit, || self.defaults.read().get(key).cloned())
    }

    fn is_set(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    fn set_default(&self, key: &str, value: ConfigValue) {
        self.defaults.write().insert(key.to_string(), value);
    }
}
