//! Request definitions
//!
//! Represents requests from clients.

use std::fmt;

/// Request types understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Get,
    Update,
    Delete,
    GetAll,
}

impl RequestType {
    /// Wire token for this request type
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Get => "GET",
            RequestType::Update => "UPDATE",
            RequestType::Delete => "DELETE",
            RequestType::GetAll => "GETALL",
        }
    }

    /// Match a wire token (exact, upper case)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(RequestType::Get),
            "UPDATE" => Some(RequestType::Update),
            "DELETE" => Some(RequestType::Delete),
            "GETALL" => Some(RequestType::GetAll),
            _ => None,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Read the value stored under a key
    Get { key: String },

    /// Store a value under a key
    Update { key: String, value: String },

    /// Remove a key
    Delete { key: String },

    /// Table-wide read; part of the grammar, answered with a null value
    GetAll,

    /// Well-formed message carrying a request token the server does not know
    Unsupported { request: String, key: Option<String> },
}

impl Request {
    pub fn get(key: impl Into<String>) -> Self {
        Request::Get { key: key.into() }
    }

    pub fn update(key: impl Into<String>, value: impl Into<String>) -> Self {
        Request::Update {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Request::Delete { key: key.into() }
    }

    /// Get the request type (`None` for unsupported requests)
    pub fn request_type(&self) -> Option<RequestType> {
        match self {
            Request::Get { .. } => Some(RequestType::Get),
            Request::Update { .. } => Some(RequestType::Update),
            Request::Delete { .. } => Some(RequestType::Delete),
            Request::GetAll => Some(RequestType::GetAll),
            Request::Unsupported { .. } => None,
        }
    }

    /// Token written in the `request` field
    pub fn token(&self) -> &str {
        match self {
            Request::Unsupported { request, .. } => request.as_str(),
            other => other.request_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Request::Get { key } | Request::Update { key, .. } | Request::Delete { key } => {
                Some(key.as_str())
            }
            Request::GetAll => None,
            Request::Unsupported { key, .. } => key.as_deref(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Request::Update { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }
}
