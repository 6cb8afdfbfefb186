//! Fixed-size worker pool and its owned, swappable handle.
//!
//! Workers are plain OS threads pulling boxed jobs from one shared channel.
//! There is no priority or cancellation: all parallelism is data-parallel
//! across independent spatial regions.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crossbeam_channel::{Sender, unbounded};

use crate::error::PoolError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Resolve a configured thread count; `0` means one per available core.
pub fn resolve_thread_count(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// A fixed set of named worker threads.
pub struct WorkerPool {
    size: usize,
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `thread_count` workers (`0` = one per core).
    pub fn new(thread_count: usize) -> Result<Self, PoolError> {
        let size = resolve_thread_count(thread_count);
        let (sender, receiver) = unbounded::<Job>();

        let mut workers = Vec::with_capacity(size);
        for index in 0..size {
            let receiver = receiver.clone();
            let handle = std::thread::Builder::new()
                .name(format!("tellus-worker-{index}"))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        // A panicking job must not take the worker down with it.
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            tracing::warn!("worker job panicked");
                        }
                    }
                })
                .map_err(PoolError::Spawn)?;
            workers.push(handle);
        }

        tracing::debug!(threads = size, "worker pool started");
        Ok(Self {
            size,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        })
    }

    /// Spawn one worker per available core.
    pub fn with_available_parallelism() -> Result<Self, PoolError> {
        Self::new(0)
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue a job. Fails once the pool has been shut down.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) -> Result<(), PoolError> {
        let sender = lock(&self.sender);
        match sender.as_ref() {
            Some(sender) => sender.send(Box::new(job)).map_err(|_| PoolError::ShutDown),
            None => Err(PoolError::ShutDown),
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        lock(&self.sender).is_none()
    }

    /// Stop accepting jobs, let workers drain the queue, and join them.
    ///
    /// Must not be called from one of this pool's own workers.
    pub fn shutdown(&self) {
        // Dropping the sender ends each worker's recv loop once the queue is empty.
        drop(lock(&self.sender).take());

        let workers = std::mem::take(&mut *lock(&self.workers));
        let joined = workers.len();
        let me = std::thread::current().id();
        for handle in workers {
            // The last Arc may be dropped by a job running on this pool.
            if handle.thread().id() == me {
                continue;
            }
            if handle.join().is_err() {
                tracing::warn!("worker thread exited abnormally");
            }
        }
        if joined > 0 {
            tracing::debug!(threads = joined, "worker pool drained");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Owned handle to the current [`WorkerPool`].
///
/// Replacing the pool drains the previous one completely before returning.
/// The swap holds a single lock throughout, so only one replacement can be
/// in flight at a time.
pub struct Workers {
    current: Mutex<Arc<WorkerPool>>,
}

impl Workers {
    /// Start a pool with `thread_count` workers (`0` = one per core).
    pub fn new(thread_count: usize) -> Result<Self, PoolError> {
        Ok(Self {
            current: Mutex::new(Arc::new(WorkerPool::new(thread_count)?)),
        })
    }

    /// The current pool.
    pub fn get(&self) -> Arc<WorkerPool> {
        Arc::clone(&lock(&self.current))
    }

    /// Thread count of the current pool.
    pub fn size(&self) -> usize {
        lock(&self.current).size()
    }

    /// Replace the pool if `thread_count` resolves to a different size.
    ///
    /// Jobs already queued on the old pool still run; new submissions to a
    /// stale `Arc<WorkerPool>` fail with [`PoolError::ShutDown`].
    pub fn resize(&self, thread_count: usize) -> Result<(), PoolError> {
        let size = resolve_thread_count(thread_count);
        let mut current = lock(&self.current);
        if current.size() == size {
            return Ok(());
        }

        let replacement = Arc::new(WorkerPool::new(size)?);
        let previous = std::mem::replace(&mut *current, replacement);
        previous.shutdown();
        tracing::info!(from = previous.size(), to = size, "worker pool resized");
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
