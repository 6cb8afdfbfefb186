use tellus_config::SmoothingConfig;
use tellus_pool::ObjectPool;

use super::{Filter, Tile};
use crate::noise::lerp;

const POOLED_BUFFERS: usize = 32;

/// Box blur, weighted per cell by its river mask so channels keep their shape.
pub struct Smoothing {
    iterations: u32,
    radius: usize,
    strength: f32,
    buffers: ObjectPool<Vec<f32>>,
}

impl Smoothing {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            iterations: config.iterations,
            radius: config.radius.max(1) as usize,
            strength: config.strength.clamp(0.0, 1.0),
            buffers: ObjectPool::new(POOLED_BUFFERS, Vec::new),
        }
    }
}

impl Filter for Smoothing {
    fn name(&self) -> &'static str {
        "smoothing"
    }

    fn apply(&self, tile: &mut Tile, _seed: u64) {
        let stride = tile.stride();
        let r = self.radius;
        if stride <= 2 * r {
            return;
        }

        let mut source = self.buffers.get();
        for _ in 0..self.iterations {
            source.clear();
            source.extend(tile.cells().iter().map(|c| c.value));

            for iz in r..stride - r {
                for ix in r..stride - r {
                    let mut sum = 0.0;
                    for z in iz - r..=iz + r {
                        let row = z * stride;
                        sum += source[row + ix - r..=row + ix + r].iter().sum::<f32>();
                    }
                    let count = ((2 * r + 1) * (2 * r + 1)) as f32;
                    let cell = tile.cell_mut(ix, iz);
                    cell.value = lerp(cell.value, sum / count, self.strength * cell.river_mask);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::test_support::tile_from;

    #[test]
    fn test_spike_is_flattened() {
        let smoothing = Smoothing::new(&SmoothingConfig::default());
        let mut tile = tile_from(8, 2, |x, z| if x == 4 && z == 4 { 0.9 } else { 0.3 });
        smoothing.apply(&mut tile, 0);
        let peak = tile.get(4, 4).value;
        assert!(peak < 0.9 && peak > 0.3, "peak {peak}");
        assert!(tile.get(5, 4).value > 0.3, "neighbour should rise");
    }

    #[test]
    fn test_flat_stays_flat() {
        let smoothing = Smoothing::new(&SmoothingConfig::default());
        let mut tile = tile_from(8, 2, |_, _| 0.4);
        smoothing.apply(&mut tile, 0);
        assert!(tile.cells().iter().all(|c| (c.value - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_masked_cells_are_kept() {
        let smoothing = Smoothing::new(&SmoothingConfig::default());
        let mut tile = tile_from(8, 2, |x, _| if x % 2 == 0 { 0.2 } else { 0.6 });
        for cell in tile.cells_mut() {
            cell.river_mask = 0.0;
        }
        let before = tile.clone();
        smoothing.apply(&mut tile, 0);
        assert_eq!(tile, before);
    }
}
