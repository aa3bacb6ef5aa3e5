//! Configuration for SocketTable
//!
//! Centralized configuration with sensible defaults for both ends of the
//! socket: [`Config`] drives the server, [`ClientConfig`] drives the client.

use std::time::Duration;

use crate::error::{Result, TableError};

/// Default TCP port for general use
pub const DEFAULT_PORT: u16 = 7777;

/// Well-known port for robot deployments ("team use" range 5800-5810)
pub const ROBOT_PORT: u16 = 5801;

/// Default host the client connects to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default maximum length of one message line (bytes)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Convert a millisecond setting into a socket timeout (`0` disables it)
pub(crate) fn timeout_from_ms(ms: u64) -> Option<Duration> {
    if ms == 0 {
        None
    } else {
        Some(Duration::from_millis(ms))
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Connection read timeout (milliseconds, 0 = wait forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = wait forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Longest accepted request line, newline excluded
    pub max_line_length: usize,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Connection worker threads.
    ///
    /// `0` serves every connection inline on the acceptor thread, one at a
    /// time. Any other value hands connections to a bounded worker pool.
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            worker_threads: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(TableError::Config("listen address is empty".to_string()));
        }
        if self.max_line_length == 0 {
            return Err(TableError::Config(
                "max line length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.write_timeout_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the maximum request line length (in bytes)
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    /// Set the number of connection workers (0 = inline)
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or IP
    pub host: String,

    /// Server port
    pub port: u16,

    /// Connection establishment timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Response read timeout (milliseconds, 0 = wait forever)
    pub read_timeout_ms: u64,

    /// Longest accepted response line
    pub max_line_length: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: 50,
            read_timeout_ms: 1000,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.read_timeout_ms)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the response read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the maximum response line length (in bytes)
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
