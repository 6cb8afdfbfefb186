//! Scoped fan-out/fan-in over a [`WorkerPool`].
//!
//! A [`Batcher`] submits a bounded set of tasks and blocks in
//! [`wait`](Batcher::wait) until every one of them has reported back over a
//! completion channel. Dropping a batcher also waits, so a batch can never
//! outlive the scope that created it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::BatchError;
use crate::worker::WorkerPool;

type Outcome = Result<(), String>;

/// A batch of tasks running on a shared pool.
pub struct Batcher {
    pool: Arc<WorkerPool>,
    capacity: usize,
    submitted: usize,
    completed: usize,
    done_tx: Sender<Outcome>,
    done_rx: Receiver<Outcome>,
}

impl Batcher {
    /// Start an empty batch accepting at most `capacity` tasks.
    pub fn new(pool: Arc<WorkerPool>, capacity: usize) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            pool,
            capacity,
            submitted: 0,
            completed: 0,
            done_tx,
            done_rx,
        }
    }

    /// Queue a task on the pool.
    pub fn submit<F>(&mut self, task: F) -> Result<(), BatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.submitted >= self.capacity {
            return Err(BatchError::Full {
                capacity: self.capacity,
            });
        }

        let done = self.done_tx.clone();
        self.pool.execute(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task)).map_err(panic_message);
            // The batcher outlives every task it submitted, so this cannot fail.
            let _ = done.send(outcome);
        })?;
        self.submitted += 1;
        Ok(())
    }

    /// Tasks submitted but not yet observed as complete.
    pub fn pending(&self) -> usize {
        self.submitted - self.completed
    }

    /// Total tasks submitted to this batch.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Block until every submitted task has finished.
    ///
    /// All tasks run to completion even if some fail; the first panic
    /// message is reported in [`BatchError::TaskFailed`].
    pub fn wait(&mut self) -> Result<(), BatchError> {
        let mut failed = 0;
        let mut first_failure = None;

        while self.completed < self.submitted {
            match self.done_rx.recv() {
                Ok(Ok(())) => {}
                Ok(Err(message)) => {
                    failed += 1;
                    first_failure.get_or_insert(message);
                }
                // Unreachable while `done_tx` is alive.
                Err(_) => break,
            }
            self.completed += 1;
        }

        match first_failure {
            None => Ok(()),
            Some(message) => {
                tracing::warn!(failed, total = self.submitted, %message, "batch tasks failed");
                Err(BatchError::TaskFailed {
                    failed,
                    total: self.submitted,
                    message,
                })
            }
        }
    }

    /// Wait for the batch and consume it.
    pub fn close(mut self) -> Result<(), BatchError> {
        self.wait()
    }
}

impl Drop for Batcher {
    fn drop(&mut self) {
        if self.pending() > 0 {
            let _ = self.wait();
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
