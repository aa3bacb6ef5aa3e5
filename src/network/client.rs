//! TCP Client
//!
//! Every call is one transaction on a fresh socket: connect, send one
//! request line, read one response line, close.
//!
//! Two API layers are offered:
//! - `try_*` methods return `Result<Option<String>>`, so an absent key
//!   (`Ok(None)`) is distinguishable from a failed request (`Err`).
//! - `get_*` / `update_*` / `delete` fall back to the caller's default (or
//!   `false`) on any failure, logging it. With these an absent key and a
//!   failed request look the same.

use std::io::BufReader;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use crate::config::ClientConfig;
use crate::error::{Result, TableError};
use crate::protocol::{read_response, write_request, Request, Response};
use crate::table::{format_bool, format_double, format_int, parse_bool, parse_double, parse_int};

/// Client for a SocketTable server
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Client for `host:port` with default timeouts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(ClientConfig::builder().host(host).port(port).build())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Transaction
    // =========================================================================

    fn resolve(&self) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()?
            .collect();
        if addrs.is_empty() {
            return Err(TableError::Config(format!(
                "{} resolved to no addresses",
                self.config.host
            )));
        }
        Ok(addrs)
    }

    fn connect(&self) -> Result<TcpStream> {
        let addrs = self.resolve()?;
        let timeout = match self.config.connect_timeout() {
            Some(timeout) => timeout,
            None => return TcpStream::connect(&addrs[..]).map_err(TableError::from),
        };

        let mut last_err = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(TableError::from_io(e, &format!("connecting to {}", addr))),
            }
        }
        Err(last_err.unwrap_or(TableError::ConnectionClosed))
    }

    /// Send one request and wait for its response
    ///
    /// The socket is owned by this call and closed on every return path.
    pub fn transact(&self, request: &Request) -> Result<Response> {
        let stream = self.connect()?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.config.read_timeout())?;

        tracing::trace!("Sending request: {:?}", request);
        let mut writer = &stream;
        write_request(&mut writer, request)?;

        let mut reader = BufReader::new(&stream);
        let response = read_response(&mut reader, self.config.max_line_length)?;
        tracing::trace!("Got response: {:?}", response);

        Ok(response)
    }

    /// Transaction reduced to the response value; failures become `None`
    fn value_or_none(&self, request: Request) -> Option<String> {
        match self.transact(&request) {
            Ok(response) => response.value,
            Err(e) => {
                tracing::warn!("{} request failed: {}", request.token(), e);
                None
            }
        }
    }

    // =========================================================================
    // Result API
    // =========================================================================

    /// Read a key; `Ok(None)` when the server holds no value for it
    pub fn try_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.transact(&Request::get(key))?.value)
    }

    /// Store a value, returning the value the server echoed
    pub fn try_update(&self, key: &str, value: &str) -> Result<Option<String>> {
        Ok(self.transact(&Request::update(key, value))?.value)
    }

    /// Remove a key, returning the value it held
    pub fn try_delete(&self, key: &str) -> Result<Option<String>> {
        Ok(self.transact(&Request::delete(key))?.value)
    }

    // =========================================================================
    // Default-on-failure API
    // =========================================================================

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.value_or_none(Request::get(key))
            .unwrap_or_else(|| default.to_string())
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
        match self.value_or_none(Request::get(key)) {
            Some(raw) => parse(&raw).unwrap_or_else(|| {
                tracing::debug!("Couldn't parse {} for key {:?}: {:?}", kind, key, raw);
                default
            }),
            None => default,
        }
    }

    /// Store a string; true when the server echoed it back unchanged
    pub fn update_string(&self, key: &str, value: &str) -> bool {
        self.value_or_none(Request::update(key, value)).as_deref() == Some(value)
    }

    pub fn update_int(&self, key: &str, value: i64) -> bool {
        self.update_string(key, &format_int(value))
    }

    pub fn update_double(&self, key: &str, value: f64) -> bool {
        self.update_string(key, &format_double(value))
    }

    pub fn update_bool(&self, key: &str, value: bool) -> bool {
        self.update_string(key, &format_bool(value))
    }

    /// Remove a key; true when the server reported a prior value
    pub fn delete(&self, key: &str) -> bool {
        self.value_or_none(Request::delete(key)).is_some()
    }
}
