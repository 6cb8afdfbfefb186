use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tellus_config::RiverConfig;

use super::{Line, River, RiverShape, RiverTags};
use crate::cell::Cell;
use crate::levels::Levels;
use crate::noise::{self, Noise};
use crate::seed::{self, Seed};
use crate::terrain::Terrains;

/// Tries per river before giving up on it.
const MAX_ATTEMPTS: usize = 8;
/// Networks kept before the cache is flushed.
const MAX_CACHED: usize = 4096;

/// The rivers that originate in one grid region.
#[derive(Debug, Default)]
pub struct RiverNetwork {
    rivers: Vec<River>,
}

impl RiverNetwork {
    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    pub fn len(&self) -> usize {
        self.rivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rivers.is_empty()
    }
}

/// River carving for the whole plane.
///
/// The plane is cut into square regions. Each region's network is derived
/// from its own RNG and the heightmap alone, so it is identical whichever
/// thread builds it first. A river never reaches more than one region past
/// the one it started in, so every point checks its own region and the
/// eight around it.
pub struct Rivers {
    world_seed: i64,
    levels: Levels,
    enabled: bool,
    region_size: f64,
    main_rivers: u32,
    tributaries: u32,
    min_source: f32,
    main: RiverShape,
    tributary: RiverShape,
    variance: Noise,
    tags: RiverTags,
    cache: DashMap<(i32, i32), Arc<RiverNetwork>>,
}

impl Rivers {
    pub fn new(seed: &mut Seed, levels: Levels, config: &RiverConfig, terrains: &Terrains) -> Self {
        Self {
            world_seed: seed.root(),
            levels,
            enabled: config.enabled,
            region_size: config.region_size.max(64) as f64,
            main_rivers: config.main_rivers,
            tributaries: config.tributaries,
            min_source: levels.water(config.min_source_height),
            main: RiverShape::new(&levels, &config.main),
            tributary: RiverShape::new(&levels, &config.tributary),
            variance: noise::perlin(seed.next(), config.variance_scale as f64, 2),
            tags: RiverTags {
                river: terrains.river,
                riverbank: terrains.riverbank,
            },
            cache: DashMap::new(),
        }
    }

    /// Whether a river may rise at a point of this height.
    pub fn valid_start(&self, value: f32) -> bool {
        value > self.min_source
    }

    /// Whether a river may end at a point of this height.
    pub fn valid_end(&self, value: f32) -> bool {
        value < self.levels.water
    }

    pub fn region_of(&self, x: f64, z: f64) -> (i32, i32) {
        (
            (x / self.region_size).floor() as i32,
            (z / self.region_size).floor() as i32,
        )
    }

    /// Number of region networks currently cached.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Carve every nearby river into `cell`, using `height` to place rivers.
    pub fn apply<H>(&self, cell: &mut Cell, x: f64, z: f64, height: &H)
    where
        H: Fn(f64, f64) -> f32,
    {
        if !self.enabled || self.main_rivers == 0 {
            return;
        }
        let (rx, rz) = self.region_of(x, z);
        let variance = self.variance.get(x, z);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let network = self.network(rx + dx, rz + dz, height);
                for river in network.rivers() {
                    river.apply(cell, x, z, variance, &self.tags);
                }
            }
        }
    }

    /// The network for region `(rx, rz)`, built on first use.
    pub fn network<H>(&self, rx: i32, rz: i32, height: &H) -> Arc<RiverNetwork>
    where
        H: Fn(f64, f64) -> f32,
    {
        if let Some(network) = self.cache.get(&(rx, rz)) {
            return Arc::clone(network.value());
        }

        let built = Arc::new(self.build(rx, rz, height));
        if self.cache.len() >= MAX_CACHED {
            self.cache.clear();
        }
        Arc::clone(self.cache.entry((rx, rz)).or_insert(built).value())
    }

    fn build<H>(&self, rx: i32, rz: i32, height: &H) -> RiverNetwork
    where
        H: Fn(f64, f64) -> f32,
    {
        let mut rng = seed::region_rng(self.world_seed, rx, rz);
        let origin = (rx as f64 * self.region_size, rz as f64 * self.region_size);
        let mut rivers = Vec::new();

        for _ in 0..self.main_rivers {
            let Some(main) = self.trace_main(&mut rng, origin, height) else {
                continue;
            };
            let branches: Vec<River> = (0..self.tributaries)
                .filter_map(|_| self.trace_tributary(&mut rng, &main, origin, height))
                .collect();
            rivers.push(main);
            rivers.extend(branches);
        }

        tracing::trace!(rx, rz, rivers = rivers.len(), "river network built");
        RiverNetwork { rivers }
    }

    fn trace_main<H>(&self, rng: &mut ChaCha8Rng, origin: (f64, f64), height: &H) -> Option<River>
    where
        H: Fn(f64, f64) -> f32,
    {
        let size = self.region_size;
        for _ in 0..MAX_ATTEMPTS {
            let sx = origin.0 + rng.random::<f64>() * size;
            let sz = origin.1 + rng.random::<f64>() * size;
            if !self.valid_start(height(sx, sz)) {
                continue;
            }

            for _ in 0..MAX_ATTEMPTS {
                let angle = rng.random_range(0.0..TAU);
                let (cos, sin) = (libm::cos(angle), libm::sin(angle));
                for step in 1..=4 {
                    let length = size * 0.225 * step as f64;
                    let (ex, ez) = (sx + cos * length, sz + sin * length);
                    if !self.in_reach(origin, ex, ez) {
                        break;
                    }
                    if self.valid_end(height(ex, ez)) {
                        return Some(River::new(Line::new(sx, sz, ex, ez), self.main, false));
                    }
                }
            }
        }
        None
    }

    fn trace_tributary<H>(
        &self,
        rng: &mut ChaCha8Rng,
        main: &River,
        origin: (f64, f64),
        height: &H,
    ) -> Option<River>
    where
        H: Fn(f64, f64) -> f32,
    {
        let line = main.line();
        for _ in 0..MAX_ATTEMPTS {
            let (jx, jz) = line.at(rng.random_range(0.3..0.8));
            let side = if rng.random::<bool>() { 1.0 } else { -1.0 };
            let angle = line.angle() + PI - side * rng.random_range(0.3..1.2);
            let length = line.length() * rng.random_range(0.3..0.6);
            let (sx, sz) = (jx + libm::cos(angle) * length, jz + libm::sin(angle) * length);
            if !self.in_reach(origin, sx, sz) || !self.valid_start(height(sx, sz)) {
                continue;
            }
            return Some(River::new(Line::new(sx, sz, jx, jz), self.tributary, true));
        }
        None
    }

    /// Whether `(x, z)` stays within one region of `origin`'s region, valley included.
    fn in_reach(&self, origin: (f64, f64), x: f64, z: f64) -> bool {
        let pad = self.main.valley_width.max(self.tributary.valley_width) * 0.5;
        let lo = (origin.0 - self.region_size + pad, origin.1 - self.region_size + pad);
        let hi = (
            origin.0 + 2.0 * self.region_size - pad,
            origin.1 + 2.0 * self.region_size - pad,
        );
        x >= lo.0 && x <= hi.0 && z >= lo.1 && z <= hi.1
    }
}
