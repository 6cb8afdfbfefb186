use tellus_config::{Ramp, WetlandsConfig};

use super::Decorator;
use crate::cell::Cell;
use crate::levels::Levels;
use crate::noise::{lerp, ramp};
use crate::terrain::Terrain;

/// Marshy river margins in temperate, moist climates.
///
/// Strength is the product of three ramps: temperature, moisture and river
/// proximity (`1 - river_mask`). Heights move toward a low bank and, where
/// the strength passes one half, on down into shallow pools.
pub struct Wetlands {
    levels: Levels,
    temperature: Ramp,
    moisture: Ramp,
    river: Ramp,
    bank: f32,
    pool: f32,
    terrain: Terrain,
}

impl Wetlands {
    pub fn new(levels: Levels, config: &WetlandsConfig, terrain: Terrain) -> Self {
        Self {
            levels,
            temperature: config.temperature.clone(),
            moisture: config.moisture.clone(),
            river: config.river.clone(),
            bank: levels.water(config.bank_height),
            pool: levels.water(-config.pool_depth),
            terrain,
        }
    }

    /// Combined wetland strength at `cell`.
    pub fn strength(&self, cell: &Cell) -> f32 {
        ramp(cell.temperature, self.temperature.min, self.temperature.max)
            * ramp(cell.moisture, self.moisture.min, self.moisture.max)
            * ramp(1.0 - cell.river_mask, self.river.min, self.river.max)
    }
}

impl Decorator for Wetlands {
    fn apply(&self, cell: &mut Cell, _x: f64, _z: f64) -> bool {
        if cell.tag.is_water() || cell.value < self.levels.water {
            return false;
        }
        let alpha = self.strength(cell);
        if alpha <= 0.0 {
            return false;
        }

        if cell.value > self.bank {
            cell.value = lerp(cell.value, self.bank, alpha);
        }
        if alpha > 0.5 {
            if cell.value > self.pool {
                cell.value = lerp(cell.value, self.pool, (alpha - 0.5) * 2.0);
            }
            return true;
        }
        false
    }

    fn terrain(&self) -> Terrain {
        self.terrain
    }
}
