//! Response definitions
//!
//! Represents responses to clients.

/// A response to send to a client
///
/// `value` is `None` when the key was absent or the request carries no value;
/// on the wire that is the null sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Key from the request this answers
    pub key: Option<String>,

    /// Resulting value
    pub value: Option<String>,
}

impl Response {
    pub fn new(key: Option<String>, value: Option<String>) -> Self {
        Self { key, value }
    }

    /// A response carrying a value for `key`
    pub fn value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    /// A null-valued response
    pub fn null(key: Option<String>) -> Self {
        Self { key, value: None }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}
