//! Droplet-based hydraulic erosion.
//!
//! Droplets spawn at random positions within the tile, run downhill with
//! some inertia, pick up sediment on steep descents and drop it when they
//! slow down or climb. Heights are simulated in blocks on a pooled scratch
//! buffer and written back scaled by each cell's river mask, so carved
//! river channels are left as they are.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tellus_config::ErosionConfig;
use tellus_pool::ObjectPool;

use super::{Filter, Tile};
use crate::levels::Levels;
use crate::noise::lerp;

/// Slope floor used for capacity on flat ground.
const MIN_SLOPE: f32 = 0.01;
/// Scratch buffers retained between tiles.
const POOLED_BUFFERS: usize = 32;

struct Droplet {
    x: f32,
    y: f32,
    dir_x: f32,
    dir_y: f32,
    speed: f32,
    water: f32,
    sediment: f32,
}

pub struct Erosion {
    levels: Levels,
    config: ErosionConfig,
    brush: Vec<(isize, isize, f32)>,
    buffers: ObjectPool<Vec<f32>>,
}

impl Erosion {
    pub fn new(levels: Levels, config: &ErosionConfig) -> Self {
        Self {
            levels,
            config: config.clone(),
            brush: brush(config.brush_radius.max(1) as isize),
            buffers: ObjectPool::new(POOLED_BUFFERS, Vec::new),
        }
    }

    fn simulate(&self, heights: &mut [f32], stride: usize, rng: &mut ChaCha8Rng) {
        let cfg = &self.config;
        let water_level = self.levels.water * self.levels.world_height();
        let limit = (stride - 1) as f32;

        for _ in 0..cfg.droplets {
            let mut drop = Droplet {
                x: rng.random_range(0.0..limit),
                y: rng.random_range(0.0..limit),
                dir_x: 0.0,
                dir_y: 0.0,
                speed: 1.0,
                water: 1.0,
                sediment: 0.0,
            };

            for _ in 0..cfg.max_lifetime {
                let (cx, cy) = (drop.x as usize, drop.y as usize);
                let (fx, fy) = (drop.x - cx as f32, drop.y - cy as f32);
                let (height, gx, gy) = sample(heights, stride, drop.x, drop.y);
                if height <= water_level {
                    break;
                }

                drop.dir_x = drop.dir_x * cfg.inertia - gx * (1.0 - cfg.inertia);
                drop.dir_y = drop.dir_y * cfg.inertia - gy * (1.0 - cfg.inertia);
                let len = libm::sqrtf(drop.dir_x * drop.dir_x + drop.dir_y * drop.dir_y);
                if len < 1e-4 {
                    break;
                }
                drop.dir_x /= len;
                drop.dir_y /= len;
                drop.x += drop.dir_x;
                drop.y += drop.dir_y;
                if drop.x < 0.0 || drop.y < 0.0 || drop.x >= limit || drop.y >= limit {
                    break;
                }

                let (next, _, _) = sample(heights, stride, drop.x, drop.y);
                let delta = next - height;
                let capacity = (-delta).max(MIN_SLOPE) * drop.speed * drop.water * cfg.capacity;

                if drop.sediment > capacity || delta > 0.0 {
                    let amount = if delta > 0.0 {
                        delta.min(drop.sediment)
                    } else {
                        (drop.sediment - capacity) * cfg.deposit_rate
                    };
                    drop.sediment -= amount;
                    deposit(heights, stride, cx, cy, fx, fy, amount);
                } else {
                    let amount = ((capacity - drop.sediment) * cfg.erosion_rate).min(-delta);
                    if amount > 0.0 {
                        self.erode(heights, stride, cx, cy, amount);
                        drop.sediment += amount;
                    }
                }

                drop.speed = libm::sqrtf((drop.speed * drop.speed - delta * cfg.gravity).max(0.0));
                drop.water *= 1.0 - cfg.evaporation;
            }
        }
    }

    fn erode(&self, heights: &mut [f32], stride: usize, cx: usize, cy: usize, amount: f32) {
        for &(dx, dy, weight) in &self.brush {
            let x = cx as isize + dx;
            let y = cy as isize + dy;
            if x < 0 || y < 0 || x >= stride as isize || y >= stride as isize {
                continue;
            }
            let h = &mut heights[y as usize * stride + x as usize];
            *h = (*h - amount * weight).max(0.0);
        }
    }
}

impl Filter for Erosion {
    fn name(&self) -> &'static str {
        "erosion"
    }

    fn apply(&self, tile: &mut Tile, seed: u64) {
        let stride = tile.stride();
        if stride < 3 {
            return;
        }
        let world_height = self.levels.world_height();

        let mut heights = self.buffers.get();
        heights.clear();
        heights.extend(tile.cells().iter().map(|c| c.value * world_height));

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.simulate(&mut heights, stride, &mut rng);

        for (cell, &h) in tile.cells_mut().iter_mut().zip(heights.iter()) {
            let eroded = (h / world_height).clamp(0.0, 1.0);
            cell.value = lerp(cell.value, eroded, cell.river_mask);
        }
    }
}

/// Bilinear height and gradient at a fractional position.
fn sample(heights: &[f32], stride: usize, x: f32, y: f32) -> (f32, f32, f32) {
    let (cx, cy) = (x as usize, y as usize);
    let (fx, fy) = (x - cx as f32, y - cy as f32);
    let i = cy * stride + cx;
    let h00 = heights[i];
    let h10 = heights[i + 1];
    let h01 = heights[i + stride];
    let h11 = heights[i + stride + 1];

    let gx = (h10 - h00) * (1.0 - fy) + (h11 - h01) * fy;
    let gy = (h01 - h00) * (1.0 - fx) + (h11 - h10) * fx;
    let h = h00 * (1.0 - fx) * (1.0 - fy)
        + h10 * fx * (1.0 - fy)
        + h01 * (1.0 - fx) * fy
        + h11 * fx * fy;
    (h, gx, gy)
}

fn deposit(
    heights: &mut [f32],
    stride: usize,
    cx: usize,
    cy: usize,
    fx: f32,
    fy: f32,
    amount: f32,
) {
    let i = cy * stride + cx;
    heights[i] += amount * (1.0 - fx) * (1.0 - fy);
    heights[i + 1] += amount * fx * (1.0 - fy);
    heights[i + stride] += amount * (1.0 - fx) * fy;
    heights[i + stride + 1] += amount * fx * fy;
}

/// Normalized radial falloff weights within `radius`.
fn brush(radius: isize) -> Vec<(isize, isize, f32)> {
    let r_sq = (radius * radius) as f32;
    let mut brush = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist_sq = (dx * dx + dy * dy) as f32;
            if dist_sq <= r_sq {
                brush.push((dx, dy, (1.0 - dist_sq / r_sq).max(0.0)));
            }
        }
    }
    let total: f32 = brush.iter().map(|b| b.2).sum();
    if total > 0.0 {
        for b in &mut brush {
            b.2 /= total;
        }
    }
    brush
}
