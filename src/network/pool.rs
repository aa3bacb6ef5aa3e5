//! Worker Pool
//!
//! Fixed set of threads fed through a bounded crossbeam channel. When every
//! worker is busy and the queue is full, `execute` blocks the acceptor.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Sender};

use crate::error::{Result, TableError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded pool of connection workers
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers sharing a queue of `queue_capacity` jobs
    pub fn new(size: usize, queue_capacity: usize) -> Result<Self> {
        if size == 0 {
            return Err(TableError::Config(
                "worker pool needs at least one thread".to_string(),
            ));
        }

        let (sender, receiver) = channel::bounded::<Job>(queue_capacity);
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("sockettable-worker-{}", id))
                .spawn(move || {
                    // Ends once the pool drops its sender and the queue drains
                    for job in receiver.iter() {
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            tracing::error!("Worker {} recovered from a panicking job", id);
                        }
                    }
                })?;
            workers.push(handle);
        }

        tracing::debug!("Started {} connection workers", size);

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Queue a job, blocking while the queue is full
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| TableError::Config("worker pool is shut down".to_string()))?;
        sender
            .send(Box::new(job))
            .map_err(|_| TableError::Config("all connection workers have exited".to_string()))
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
