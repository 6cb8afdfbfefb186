//! Resource pooling and parallel execution for terrain generation.
//!
//! - [`ObjectPool`]: a capacity-bounded free list of reusable scratch values.
//! - [`WorkerPool`]: a fixed set of named OS threads pulling jobs from a shared queue.
//! - [`Workers`]: an owned, swappable handle to the current worker pool.
//! - [`Batcher`]: scoped fan-out/fan-in over a worker pool with guaranteed join.

mod batch;
mod error;
mod object_pool;
mod worker;

pub use batch::Batcher;
pub use error::{BatchError, PoolError};
pub use object_pool::{ObjectPool, Pooled};
pub use worker::{WorkerPool, Workers, resolve_thread_count};
