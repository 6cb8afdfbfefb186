use tellus_config::SteepnessConfig;

use super::{Filter, Tile};
use crate::levels::Levels;

/// Derives `steepness` from the height difference across each cell's neighbours.
#[derive(Clone, Copy, Debug)]
pub struct Steepness {
    world_height: f32,
    full_slope: f32,
}

impl Steepness {
    pub fn new(levels: Levels, config: &SteepnessConfig) -> Self {
        Self {
            world_height: levels.world_height(),
            full_slope: config.full_slope.max(f32::EPSILON),
        }
    }

    /// Steepness from the heights of the four direct neighbours.
    #[inline]
    pub fn estimate(&self, east: f32, west: f32, north: f32, south: f32) -> f32 {
        let dx = (east - west) * self.world_height;
        let dz = (south - north) * self.world_height;
        (libm::sqrtf(dx * dx + dz * dz) / self.full_slope).clamp(0.0, 1.0)
    }
}

impl Filter for Steepness {
    fn name(&self) -> &'static str {
        "steepness"
    }

    fn apply(&self, tile: &mut Tile, _seed: u64) {
        let stride = tile.stride() as isize;
        for iz in 0..stride {
            for ix in 0..stride {
                let steepness = self.estimate(
                    tile.cell_clamped(ix + 1, iz).value,
                    tile.cell_clamped(ix - 1, iz).value,
                    tile.cell_clamped(ix, iz - 1).value,
                    tile.cell_clamped(ix, iz + 1).value,
                );
                tile.cell_mut(ix as usize, iz as usize).steepness = steepness;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::test_support::tile_from;

    fn steepness() -> Steepness {
        Steepness::new(Levels::new(256, 63), &SteepnessConfig { full_slope: 6.0 })
    }

    #[test]
    fn test_flat_is_zero() {
        let mut tile = tile_from(8, 1, |_, _| 0.5);
        steepness().apply(&mut tile, 0);
        assert!(tile.cells().iter().all(|c| c.steepness == 0.0));
    }

    #[test]
    fn test_gentle_and_cliff() {
        let s = steepness();
        let unit = 1.0 / 256.0;
        let gentle = s.estimate(0.5 + unit, 0.5 - unit, 0.5, 0.5);
        assert!((gentle - 2.0 / 6.0).abs() < 1e-4, "gentle {gentle}");
        assert_eq!(s.estimate(0.9, 0.1, 0.5, 0.5), 1.0);
    }

    #[test]
    fn test_tile_ramp() {
        let mut tile = tile_from(8, 1, |x, _| 0.5 + x as f32 / 256.0);
        steepness().apply(&mut tile, 0);
        let s = tile.get(3, 3).steepness;
        assert!((s - 2.0 / 6.0).abs() < 1e-3, "interior steepness {s}");
    }
}
