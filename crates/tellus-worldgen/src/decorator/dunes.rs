use tellus_config::DunesConfig;

use super::Decorator;
use crate::cell::Cell;
use crate::levels::Levels;
use crate::noise::{self, EdgeFunction, Noise, ramp};
use crate::seed::Seed;
use crate::terrain::Terrain;

/// Ridged cellular dunes in hot, dry climates.
///
/// Dune height scales with how far the climate is past `climate_min` and
/// with the biome mask, so dunes fade out toward climate cell borders.
pub struct DesertDunes {
    levels: Levels,
    climate_min: f32,
    climate_max: f32,
    max_height: f32,
    noise: Noise,
    terrain: Terrain,
}

impl DesertDunes {
    pub fn new(seed: &mut Seed, levels: Levels, config: &DunesConfig, terrain: Terrain) -> Self {
        let scale = config.scale.max(1) as f64;
        let noise = noise::cell_edge(seed.next(), scale, 0.8, EdgeFunction::Distance2Sub)
            .invert()
            .pow(3.0)
            .warp(seed, scale, 2, scale / 3.0);
        Self {
            levels,
            climate_min: config.climate_min,
            climate_max: config.climate_max,
            max_height: levels.scale(config.max_height),
            noise,
            terrain,
        }
    }

    /// Climate dryness in `[0, 1]`: hot and dry is high.
    #[inline]
    pub fn climate(cell: &Cell) -> f32 {
        cell.temperature * (1.0 - cell.moisture)
    }
}

impl Decorator for DesertDunes {
    fn apply(&self, cell: &mut Cell, x: f64, z: f64) -> bool {
        let climate = Self::climate(cell);
        if climate < self.climate_min || cell.value <= self.levels.water || cell.tag.is_water() {
            return false;
        }
        let climate_mask = ramp(climate, self.climate_min, self.climate_max);
        let height = self.noise.get(x, z) * climate_mask * cell.biome_mask * self.max_height;
        cell.value = (cell.value + height).min(1.0);
        height >= self.levels.unit
    }

    fn terrain(&self) -> Terrain {
        self.terrain
    }
}
