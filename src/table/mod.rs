//! Table Module
//!
//! The in-memory string table served over the socket.
//!
//! ## Responsibilities
//! - Own the key/value map for one server instance
//! - Make every single-key operation atomic
//! - Convert typed values to and from their stored string form
//!
//! ## Data Structure Choice
//! `HashMap<String, String>` behind a `parking_lot::RwLock`:
//! - Key order is irrelevant to the protocol
//! - Reads share the lock, writes take it exclusively
//! - There is no multi-key transaction, so one lock per operation is enough

mod store;
mod value;

pub use store::Table;
pub use value::{format_bool, format_double, format_int, parse_bool, parse_double, parse_int};
