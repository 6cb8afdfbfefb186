//! Terrain populators: noise graphs that fill in a cell's height and tag.

mod landform;
mod lerper;
mod provider;
mod selector;

pub use landform::Landforms;
pub use lerper::RegionLerper;
pub use provider::{BLEND_MIDPOINT, BLEND_RANGE, TerrainProvider};
pub use selector::RegionSelector;

use crate::cell::Cell;
use crate::noise::Noise;
use crate::terrain::Terrain;

/// Writes height (and optionally a tag) onto a cell.
pub trait Populator: Send + Sync {
    /// Set `cell.value` for the point `(x, z)`.
    fn apply(&self, cell: &mut Cell, x: f64, z: f64);

    /// Set `cell.tag` for the point `(x, z)`.
    fn tag(&self, cell: &mut Cell, x: f64, z: f64);
}

/// Relative selection weight.
pub trait Weighted {
    fn weight(&self) -> f32;
}

/// A terrain paired with the noise graph producing its heights.
#[derive(Clone, Debug)]
pub struct TerrainPopulator {
    terrain: Terrain,
    source: Noise,
}

impl TerrainPopulator {
    pub fn new(terrain: Terrain, source: Noise) -> Self {
        Self { terrain, source }
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn source(&self) -> &Noise {
        &self.source
    }
}

impl Populator for TerrainPopulator {
    #[inline]
    fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        cell.value = self.source.get(x, z).clamp(0.0, 1.0);
    }

    #[inline]
    fn tag(&self, cell: &mut Cell, _x: f64, _z: f64) {
        cell.tag = self.terrain;
    }
}

impl Weighted for TerrainPopulator {
    fn weight(&self) -> f32 {
        self.terrain.weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::constant;
    use crate::terrain::TerrainKind;

    #[test]
    fn test_terrain_populator_clamps() {
        let terrain = Terrain::new(13, 2.0, TerrainKind::Land);
        let populator = TerrainPopulator::new(terrain, constant(1.5));
        let mut cell = Cell::default();
        populator.apply(&mut cell, 0.0, 0.0);
        populator.tag(&mut cell, 0.0, 0.0);
        assert_eq!(cell.value, 1.0);
        assert_eq!(cell.tag, terrain);
        assert_eq!(populator.weight(), 2.0);
    }
}
