//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One request and one response per connection
//! - Connections served inline, or on a bounded worker pool
//! - Requests routed through Engine

mod client;
mod connection;
mod pool;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use pool::WorkerPool;
pub use server::{Server, ShutdownHandle};
