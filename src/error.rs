//! Error types for SocketTable
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Unified error type for SocketTable operations
#[derive(Debug, Error)]
pub enum TableError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Message exceeds {limit} bytes")]
    MessageTooLong { limit: usize },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TableError {
    /// Map an I/O error onto `Timeout` when it is a deadline expiry
    ///
    /// Unix reports an elapsed socket timeout as `WouldBlock`, Windows as `TimedOut`.
    pub fn from_io(err: std::io::Error, context: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                TableError::Timeout(format!("{}: {}", context, err))
            }
            _ => TableError::Io(err),
        }
    }

    /// True for deadline expiries
    pub fn is_timeout(&self) -> bool {
        matches!(self, TableError::Timeout(_))
    }
}
