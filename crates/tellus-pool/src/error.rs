//! Error types for the pooling substrate.

/// Errors raised by a [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The pool was shut down and accepts no more jobs.
    #[error("worker pool has been shut down")]
    ShutDown,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors raised by a [`Batcher`](crate::Batcher).
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The underlying pool rejected a task.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// More tasks were submitted than the batch was sized for.
    #[error("batch is full ({capacity} tasks)")]
    Full { capacity: usize },

    /// One or more tasks panicked. All other tasks still ran to completion.
    #[error("{failed} of {total} batch tasks failed: {message}")]
    TaskFailed {
        failed: usize,
        total: usize,
        /// Panic payload of the first failure.
        message: String,
    },
}
