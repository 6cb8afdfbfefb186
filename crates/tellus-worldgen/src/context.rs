//! Per-world generation state shared by every component.

use std::sync::Arc;

use tellus_config::Config;
use tellus_pool::Workers;

use crate::error::WorldgenError;
use crate::levels::Levels;
use crate::seed::Seed;
use crate::terrain::Terrains;

/// Created once per world. Components take a private copy via
/// [`copy`](Self::copy) so their seed sequences never interleave.
#[derive(Clone)]
pub struct GeneratorContext {
    pub seed: Seed,
    pub levels: Levels,
    pub terrains: Terrains,
    pub settings: Arc<Config>,
    pub workers: Arc<Workers>,
}

impl GeneratorContext {
    /// Build a context and start its worker pool.
    ///
    /// # Errors
    ///
    /// Fails on a zero world height or if worker threads cannot be spawned.
    pub fn new(settings: Config) -> Result<Self, WorldgenError> {
        if settings.world.world_height == 0 {
            return Err(WorldgenError::InvalidSettings(
                "world_height must be positive".to_string(),
            ));
        }
        let workers = Arc::new(Workers::new(settings.threads.worker_threads)?);
        tracing::info!(
            seed = settings.world.seed,
            threads = workers.size(),
            "generator context created"
        );
        Ok(Self::from_parts(
            Seed::new(settings.world.seed),
            Terrains::new(),
            Arc::new(settings),
            workers,
        ))
    }

    /// Assemble a context around an existing pool.
    pub fn from_parts(
        seed: Seed,
        terrains: Terrains,
        settings: Arc<Config>,
        workers: Arc<Workers>,
    ) -> Self {
        let levels = Levels::new(settings.world.world_height, settings.world.sea_level);
        Self {
            seed,
            levels,
            terrains,
            settings,
            workers,
        }
    }

    /// An independent copy with its own seed counter at the current position.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Config {
        let mut config = Config::default();
        config.world.seed = 1234;
        config.threads.worker_threads = 1;
        config
    }

    #[test]
    fn test_new_derives_levels() {
        let ctx = GeneratorContext::new(settings()).unwrap();
        assert_eq!(ctx.seed.root(), 1234);
        assert_eq!(ctx.levels, Levels::new(256, 63));
        assert_eq!(ctx.workers.size(), 1);
    }

    #[test]
    fn test_copies_do_not_share_seed_counters() {
        let ctx = GeneratorContext::new(settings()).unwrap();
        let mut a = ctx.copy();
        let mut b = ctx.copy();
        let first = a.seed.next();
        a.seed.next();
        assert_eq!(b.seed.next(), first);
        assert!(Arc::ptr_eq(&a.workers, &b.workers));
    }

    #[test]
    fn test_zero_height_rejected() {
        let mut config = settings();
        config.world.world_height = 0;
        assert!(matches!(
            GeneratorContext::new(config),
            Err(WorldgenError::InvalidSettings(_))
        ));
    }
}
