//! Partitions the plane into warped cellular regions.
//!
//! Every point gets the identity of the region it falls in and an edge value
//! that is `0` across the region's interior and rises to `1` at the boundary
//! with its neighbour. Both terrain regions and climate cells use this.

use crate::cell::Cell;
use crate::noise::{DistanceFunction, EdgeFunction, Warp, cell_identity, nearest_two};
use crate::seed::Seed;

/// Exponent applied to the `d0 / d1` ratio before thresholding.
pub const EDGE_POWER: f32 = 2.0;

/// Ratio (after [`EDGE_POWER`]) below which a point counts as interior.
const EDGE_START: f32 = 0.5;

/// Classification of a single point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    /// Region identity in `[0, 1]`.
    pub identity: f32,
    /// Edge proximity in `[0, 1]`.
    pub edge: f32,
    pub cell_x: i32,
    pub cell_y: i32,
}

/// Warped cellular region classifier.
#[derive(Clone, Debug)]
pub struct RegionClassifier {
    seed: i32,
    size: f64,
    jitter: f32,
    warp: Warp,
}

impl RegionClassifier {
    /// Regions `size` blocks across, boundaries displaced by up to
    /// `warp_strength` blocks of noise with feature size `warp_scale`.
    pub fn new(
        seed: &mut Seed,
        size: u32,
        warp_scale: u32,
        warp_strength: f32,
        jitter: f32,
    ) -> Self {
        let region_seed = seed.next();
        let warp = Warp::new(seed, warp_scale.max(1) as f64, 2, warp_strength as f64);
        Self {
            seed: region_seed,
            size: size.max(1) as f64,
            jitter: jitter.clamp(0.0, 1.0),
            warp,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn classify(&self, x: f64, y: f64) -> Region {
        let (wx, wy) = self.warp.displace(x, y);
        let sample = nearest_two(
            self.seed,
            wx / self.size,
            wy / self.size,
            self.jitter,
            DistanceFunction::Natural,
        );
        let ratio = EdgeFunction::Distance2Div.apply(sample.d0, sample.d1);
        Region {
            identity: cell_identity(self.seed, sample.cell_x, sample.cell_y),
            edge: edge_value(ratio),
            cell_x: sample.cell_x,
            cell_y: sample.cell_y,
        }
    }

    /// Approximate world position of a region's center.
    pub fn center(&self, region: &Region) -> (f64, f64) {
        (region.cell_x as f64 * self.size, region.cell_y as f64 * self.size)
    }

    /// Write `region` and `region_edge` on `cell`.
    pub fn apply(&self, cell: &mut Cell, x: f64, y: f64) {
        let region = self.classify(x, y);
        cell.region = region.identity;
        cell.region_edge = region.edge;
    }
}

/// Map a `d0 / d1` ratio in `[0, 1]` to an edge value in `[0, 1]`.
pub fn edge_value(ratio: f32) -> f32 {
    if ratio.is_nan() {
        return 0.0;
    }
    let shaped = libm::powf(ratio.clamp(0.0, 1.0), EDGE_POWER);
    ((shaped - EDGE_START) / (1.0 - EDGE_START)).clamp(0.0, 1.0)
}
