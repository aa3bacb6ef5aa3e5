//! Table implementation
//!
//! HashMap-based table with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::value::{format_bool, format_double, format_int, parse_bool, parse_double, parse_int};

/// Shared key/value table
///
/// One instance is created per server and handed to every connection; no
/// operation spans more than one lock acquisition.
pub struct Table {
    data: RwLock<HashMap<String, String>>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every entry
    pub fn reset(&self) {
        *self.data.write() = HashMap::new();
        tracing::debug!("Table reset");
    }

    /// Look up a key without a fallback
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_parsed(key, default, parse_int, "int")
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.get_parsed(key, default, parse_double, "double")
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_parsed(key, default, parse_bool, "bool")
    }

    fn get_parsed<T>(&self, key: &str, default: T, parse: fn(&str) -> Option<T>, kind: &str) -> T {
        let data = self.data.read();
        match data.get(key) {
            Some(raw) => parse(raw).unwrap_or_else(|| {
                tracing::debug!("Couldn't parse {} for key {:?}: {:?}", kind, key, raw);
                default
            }),
            None => default,
        }
    }

    /// Store a value, overwriting any previous one, and echo it back
    pub fn update_string(&self, key: &str, value: &str) -> String {
        self.data.write().insert(key.to_string(), value.to_string());
        value.to_string()
    }

    pub fn update_int(&self, key: &str, value: i64) -> i64 {
        self.data.write().insert(key.to_string(), format_int(value));
        value
    }

    pub fn update_double(&self, key: &str, value: f64) -> f64 {
        self.data.write().insert(key.to_string(), format_double(value));
        value
    }

    pub fn update_bool(&self, key: &str, value: bool) -> bool {
        self.data.write().insert(key.to_string(), format_bool(value));
        value
    }

    /// Remove a key, returning the value it held
    pub fn delete(&self, key: &str) -> Option<String> {
        self.data.write().remove(key)
    }

    /// Copy of every entry at one instant
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.data.read().clone()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
