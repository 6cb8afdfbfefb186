//! World generation error types.

use tellus_pool::{BatchError, PoolError};

/// Errors raised while building or driving a generator.
///
/// Per-point sampling never fails; everything here is construction-time
/// misuse or a failure surfaced from the worker pool.
#[derive(Debug, thiserror::Error)]
pub enum WorldgenError {
    /// A region selector needs at least one populator.
    #[error("cannot build a region selector from an empty populator list")]
    EmptyPopulators,

    /// Populator weights must be finite and positive.
    #[error("populator {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f32 },

    /// A terrain name was registered twice.
    #[error("duplicate terrain name: {0}")]
    DuplicateTerrain(String),

    /// A settings value cannot be used to build the generator.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The worker pool could not be started.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// A batch of tile computations failed.
    #[error(transparent)]
    Batch(#[from] BatchError),
}
