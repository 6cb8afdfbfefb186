use tellus_config::SwampConfig;

use super::Decorator;
use crate::cell::Cell;
use crate::levels::Levels;
use crate::noise::{self, Noise, lerp, ramp};
use crate::seed::Seed;
use crate::terrain::Terrain;

/// Shallow pools in warm, wet lowland.
///
/// Only land between the water line and `fade_end` blocks above it is
/// affected, at full strength below `fade_start`. Heights are only lowered.
pub struct SwampPools {
    levels: Levels,
    moisture_min: f32,
    temperature_min: f32,
    fade_start: f32,
    fade_end: f32,
    floor: f32,
    noise: Noise,
    terrain: Terrain,
}

impl SwampPools {
    pub fn new(seed: &mut Seed, levels: Levels, config: &SwampConfig, terrain: Terrain) -> Self {
        let scale = config.scale.max(1) as f64;
        let noise = noise::perlin(seed.next(), scale, 2)
            .curve(|v| ramp(v, 0.45, 0.65))
            .warp(seed, scale, 1, scale / 2.0);
        Self {
            levels,
            moisture_min: config.moisture_min,
            temperature_min: config.temperature_min,
            fade_start: levels.water(config.fade_start),
            fade_end: levels.water(config.fade_end.max(config.fade_start)),
            floor: levels.water(-config.pool_depth),
            noise,
            terrain,
        }
    }
}

impl Decorator for SwampPools {
    fn apply(&self, cell: &mut Cell, x: f64, z: f64) -> bool {
        if cell.moisture < self.moisture_min
            || cell.temperature < self.temperature_min
            || cell.tag.is_water()
            || cell.value <= self.levels.water
            || cell.value >= self.fade_end
        {
            return false;
        }

        let wetness = ramp(cell.moisture, self.moisture_min, 1.0);
        let alpha = self.noise.get(x, z) * wetness;
        let fade = 1.0 - ramp(cell.value, self.fade_start, self.fade_end);
        let pooled = lerp(cell.value, self.floor, alpha);
        cell.value = lerp(cell.value, pooled, fade);
        cell.value < self.levels.water
    }

    fn terrain(&self) -> Terrain {
        self.terrain
    }
}
