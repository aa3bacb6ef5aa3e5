//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::Engine;
use crate::error::{Result, TableError};
use crate::protocol::{read_request, write_response};

/// Handles a single client connection
///
/// A connection carries exactly one request and at most one response:
///
/// ```text
/// AWAIT_MESSAGE -> PARSE -> DISPATCH -> RESPOND -> CLOSED
/// ```
///
/// Any failure jumps straight to CLOSED. [`Connection::handle`] consumes the
/// connection, so the socket is closed whichever step returns.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the request engine
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,

    /// Longest request line accepted
    max_line_length: usize,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, engine: Arc<Engine>, max_line_length: usize) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            peer_addr,
            max_line_length,
        })
    }

    /// Configure connection timeouts (`None` waits forever)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    /// Serve the single request on this connection, then close it
    ///
    /// Malformed messages are logged and the connection is closed without a
    /// reply. Errors returned are transport failures, already logged.
    pub fn handle(mut self) -> Result<()> {
        tracing::debug!("Client connected: {}", self.peer_addr);

        let request = match read_request(&mut self.reader, self.max_line_length) {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::debug!("Client {} closed without sending a message", self.peer_addr);
                return Ok(());
            }
            Err(e @ (TableError::Protocol(_) | TableError::MessageTooLong { .. })) => {
                tracing::warn!("Unable to parse message from {}: {}", self.peer_addr, e);
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("Failed reading from {}: {}", self.peer_addr, e);
                return Err(e);
            }
        };

        tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);

        let response = self.engine.execute(request);

        tracing::trace!("Sending response to {}: {:?}", self.peer_addr, response);

        if let Err(e) = write_response(&mut self.writer, &response) {
            if let TableError::Io(ref io_err) = e {
                match io_err.kind() {
                    std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::BrokenPipe => {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                    _ => {}
                }
            }
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            return Err(e);
        }

        Ok(())
    }
}
