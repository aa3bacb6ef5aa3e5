//! Engine Module
//!
//! Routes decoded requests to the table and builds the response.
//!
//! ## Responsibilities
//! - Dispatch GET/UPDATE/DELETE to the table
//! - Answer GETALL and unknown requests with a null value, table untouched
//! - Run per-key callbacks after a request touches that key

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::protocol::{Request, RequestType, Response};
use crate::table::Table;

/// Function run after a request names a watched key.
///
/// Receives the value carried by the response and the request type. Only
/// GET, UPDATE and DELETE requests run callbacks; unknown request types and
/// GETALL never do. A panicking callback is logged and does not affect the
/// response.
pub type Callback = Arc<dyn Fn(Option<&str>, RequestType) + Send + Sync>;

/// Request dispatcher shared by every connection of one server
///
/// The table is injected, never global: every server builds (or is given)
/// its own and all of its connections see the same instance.
pub struct Engine {
    /// Backing table
    table: Arc<Table>,

    /// Callbacks keyed by table key
    callbacks: RwLock<HashMap<String, Callback>>,
}

impl Engine {
    /// Create an engine over a fresh, empty table
    pub fn new() -> Self {
        Self::with_table(Arc::new(Table::new()))
    }

    /// Create an engine over an existing table
    pub fn with_table(table: Arc<Table>) -> Self {
        Self {
            table,
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Register `callback` for `key`, replacing any earlier one
    pub fn set_callback<F>(&self, key: impl Into<String>, callback: F)
    where
        F: Fn(Option<&str>, RequestType) + Send + Sync + 'static,
    {
        let key = key.into();
        tracing::debug!("Registering callback for key {:?}", key);
        self.callbacks.write().insert(key, Arc::new(callback));
    }

    /// Remove the callback for `key`, returning whether one was registered
    pub fn remove_callback(&self, key: &str) -> bool {
        self.callbacks.write().remove(key).is_some()
    }

    /// Execute a request
    ///
    /// Never fails: requests the table cannot serve produce a null value.
    pub fn execute(&self, request: Request) -> Response {
        let response = match &request {
            Request::Get { key } => Response::new(Some(key.clone()), self.table.get(key)),
            Request::Update { key, value } => {
                let echoed = self.table.update_string(key, value);
                Response::value(key.clone(), echoed)
            }
            Request::Delete { key } => Response::new(Some(key.clone()), self.table.delete(key)),
            Request::GetAll => {
                tracing::debug!("GETALL is not served over the wire");
                Response::null(None)
            }
            Request::Unsupported { request: token, key } => {
                tracing::warn!("Unknown request type: {:?}", token);
                Response::null(key.clone())
            }
        };

        if let (Some(request_type), Some(key)) = (request.request_type(), request.key()) {
            self.run_callback(key, response.value.as_deref(), request_type);
        }

        response
    }

    fn run_callback(&self, key: &str, value: Option<&str>, request_type: RequestType) {
        // Clone out of the lock so a callback may register others
        let callback = self.callbacks.read().get(key).cloned();
        if let Some(callback) = callback {
            tracing::trace!("Running callback for key {:?} ({})", key, request_type);
            if panic::catch_unwind(AssertUnwindSafe(|| callback(value, request_type))).is_err() {
                tracing::error!("Callback for key {:?} panicked ({})", key, request_type);
            }
        }
    }

    /// Get the backing table
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
