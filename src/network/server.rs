//! TCP Server
//!
//! Accepts connections and runs one request/response cycle per connection,
//! either inline on the acceptor thread or on a worker pool.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use super::{Connection, WorkerPool};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{Result, TableError};

/// Pause after a failed accept so a persistent error does not spin the thread
const ACCEPT_BACKOFF: Duration = Duration::from_millis(10);

/// How long `shutdown` waits while poking the listener awake
const WAKE_TIMEOUT: Duration = Duration::from_millis(200);

/// Queued connections per worker before the acceptor blocks
const QUEUE_PER_WORKER: usize = 4;

/// TCP server for SocketTable
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: Option<TcpListener>,
    stopped: Arc<AtomicBool>,
    wake_addr: Arc<Mutex<Option<SocketAddr>>>,
}

impl Server {
    /// Create a new server with the given config and engine
    pub fn new(config: Config, engine: Arc<Engine>) -> Self {
        Self {
            config,
            engine,
            listener: None,
            stopped: Arc::new(AtomicBool::new(false)),
            wake_addr: Arc::new(Mutex::new(None)),
        }
    }

    /// Bind the listening socket, returning the bound address
    ///
    /// On failure the server is marked stopped for good.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }
        if self.is_stopped() {
            return Err(TableError::Config("server is stopped".to_string()));
        }

        let bound = self
            .config
            .validate()
            .and_then(|_| TcpListener::bind(&self.config.listen_addr).map_err(TableError::from))
            .and_then(|listener| Ok((listener.local_addr()?, listener)));

        match bound {
            Ok((addr, listener)) => {
                tracing::info!("SocketTable server listening on {}", addr);
                *self.wake_addr.lock() = Some(wake_target(addr));
                self.listener = Some(listener);
                Ok(addr)
            }
            Err(e) => {
                self.stopped.store(true, Ordering::SeqCst);
                tracing::error!(
                    "Failed to start SocketTable server on {}: {}",
                    self.config.listen_addr,
                    e
                );
                Err(e)
            }
        }
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&mut self) -> Result<()> {
        self.bind()?;
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Err(TableError::Config("listener missing after bind".to_string())),
        };

        let pool = match self.config.worker_threads {
            0 => None,
            n => Some(WorkerPool::new(n, n * QUEUE_PER_WORKER)?),
        };
        match &pool {
            Some(pool) => tracing::info!("Serving connections on {} workers", pool.size()),
            None => tracing::info!("Serving connections inline"),
        }

        while !self.stopped.load(Ordering::SeqCst) {
            let stream = match listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) => {
                    tracing::warn!("Failure on accept: {}", e);
                    thread::sleep(ACCEPT_BACKOFF);
                    continue;
                }
            };

            // The shutdown wake-up connection lands here
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }

            match &pool {
                Some(pool) => {
                    let engine = Arc::clone(&self.engine);
                    let config = self.config.clone();
                    if let Err(e) = pool.execute(move || serve(stream, engine, &config)) {
                        tracing::error!("Could not queue connection: {}", e);
                        break;
                    }
                }
                None => {
                    let engine = Arc::clone(&self.engine);
                    let served =
                        panic::catch_unwind(AssertUnwindSafe(|| serve(stream, engine, &self.config)));
                    if served.is_err() {
                        tracing::error!("Recovered from a panic while serving a connection");
                    }
                    tracing::trace!("SocketTable server waiting...");
                }
            }
        }

        // Dropping the pool joins the workers after queued connections finish
        drop(pool);
        tracing::info!("SocketTable server stopped");
        Ok(())
    }

    /// Handle that stops the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            stopped: Arc::clone(&self.stopped),
            wake_addr: Arc::clone(&self.wake_addr),
        }
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        self.shutdown_handle().shutdown();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Loopback-reachable address of the listener, once bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.wake_addr.lock()
    }
}

/// Stops a running [`Server`]
///
/// Setting the flag alone would only be noticed after the next accept, so
/// `shutdown` also opens a throwaway connection to release a blocked accept.
#[derive(Clone)]
pub struct ShutdownHandle {
    stopped: Arc<AtomicBool>,
    wake_addr: Arc<Mutex<Option<SocketAddr>>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("SocketTable server shutting down");

        let addr = *self.wake_addr.lock();
        if let Some(addr) = addr {
            if let Err(e) = TcpStream::connect_timeout(&addr, WAKE_TIMEOUT) {
                tracing::debug!("Wake-up connection to {} failed: {}", addr, e);
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Run one connection to completion, logging rather than propagating failures
fn serve(stream: TcpStream, engine: Arc<Engine>, config: &Config) {
    let result = Connection::new(stream, engine, config.max_line_length).and_then(|mut conn| {
        conn.set_timeouts(config.read_timeout(), config.write_timeout())?;
        conn.handle()
    });

    if let Err(e) = result {
        tracing::debug!("Connection ended with error: {}", e);
    }
}

/// Loopback equivalent of a wildcard bind address
fn wake_target(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}
