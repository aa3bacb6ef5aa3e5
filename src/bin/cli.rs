//! SocketTable CLI Client
//!
//! Command-line interface for interacting with a SocketTable server.

use clap::{Parser, Subcommand};
use sockettable::{Client, ClientConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// SocketTable CLI
#[derive(Parser, Debug)]
#[command(name = "sockettable-cli")]
#[command(about = "CLI for the SocketTable key-value server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "7777")]
    port: u16,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "50")]
    connect_timeout_ms: u64,

    /// Response timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "1000")]
    read_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let client = Client::with_config(
        ClientConfig::builder()
            .host(&args.host)
            .port(args.port)
            .connect_timeout_ms(args.connect_timeout_ms)
            .read_timeout_ms(args.read_timeout_ms)
            .build(),
    );

    let result = match &args.command {
        Commands::Get { key } => client.try_get(key),
        Commands::Set { key, value } => client.try_update(key, value),
        Commands::Del { key } => client.try_delete(key),
    };

    match result {
        Ok(Some(value)) => println!("{}", value),
        Ok(None) => println!("(nil)"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
