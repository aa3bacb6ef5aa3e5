//! SocketTable Server Binary
//!
//! Starts the TCP server for SocketTable.

use std::sync::Arc;

use clap::Parser;
use sockettable::{Config, Engine, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// SocketTable Server
#[derive(Parser, Debug)]
#[command(name = "sockettable-server")]
#[command(about = "Key-value table served over a line-delimited TCP protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port); robot deployments use port 5801
    #[arg(short, long, default_value = "127.0.0.1:7777")]
    listen: String,

    /// Connection worker threads (0 = serve one connection at a time)
    #[arg(short, long, default_value = "0")]
    workers: usize,

    /// Request read timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Response write timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Longest accepted request line in bytes
    #[arg(long, default_value = "1024")]
    max_line_length: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sockettable=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SocketTable Server v{}", sockettable::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .max_line_length(args.max_line_length)
        .build();

    let engine = Arc::new(Engine::new());

    // Start server
    let mut server = Server::new(config, engine);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
