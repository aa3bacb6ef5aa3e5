//! # SocketTable
//!
//! A string-keyed key/value table shared between processes over TCP:
//! - Line-delimited, JSON-like text protocol
//! - One request and one response per connection
//! - Atomic single-key get/update/delete on the server
//! - Typed (int/double/bool) accessors layered over string values
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Client (transaction)                     │
//! │            connect → send line → read line → close           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ TCP
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Server (acceptor loop)                       │
//! │          inline, or bounded worker pool                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection (one request)                     │
//! │               decode → dispatch → encode                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                ┌──────▼──────┐          ┌─────────────┐
//!                │   Engine    │─────────▶│  Callbacks  │
//!                └──────┬──────┘          └─────────────┘
//!                       │
//!                ┌──────▼──────┐
//!                │    Table    │
//!                │  (RwLock)   │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TableError, Result};
pub use config::{ClientConfig, Config};
pub use engine::Engine;
pub use network::{Client, Server, ShutdownHandle};
pub use table::Table;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SocketTable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
