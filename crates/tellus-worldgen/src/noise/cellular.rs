//! Jittered-grid cellular noise.
//!
//! Each integer lattice cell holds one feature point, offset from the cell
//! center by a hashed jitter vector. Queries scan the 3x3 neighbourhood
//! around the nearest lattice point and keep the two closest features.

use crate::seed::{hash2, unit2};

use super::Module;

/// Largest jitter offset from a cell center, in cell units.
const MAX_JITTER: f32 = 0.45;

/// Salt separating a cell's identity hash from its jitter hash.
const IDENTITY_SALT: i32 = 0x5f3c_1a29;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceFunction {
    Euclidean,
    Manhattan,
    /// Sum of Manhattan and squared Euclidean distance; rounder than
    /// Manhattan, cheaper than Euclidean.
    #[default]
    Natural,
}

impl DistanceFunction {
    #[inline]
    pub fn apply(self, dx: f32, dy: f32) -> f32 {
        match self {
            DistanceFunction::Euclidean => libm::sqrtf(dx * dx + dy * dy),
            DistanceFunction::Manhattan => dx.abs() + dy.abs(),
            DistanceFunction::Natural => dx.abs() + dy.abs() + (dx * dx + dy * dy),
        }
    }
}

/// How the two nearest distances combine into an edge value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeFunction {
    Distance2,
    Distance2Add,
    Distance2Sub,
    Distance2Mul,
    /// `d0 / d1`: `0` at a feature point, `1` on a boundary.
    Distance2Div,
}

impl EdgeFunction {
    #[inline]
    pub fn apply(self, d0: f32, d1: f32) -> f32 {
        match self {
            EdgeFunction::Distance2 => d1,
            EdgeFunction::Distance2Add => d0 + d1,
            EdgeFunction::Distance2Sub => d1 - d0,
            EdgeFunction::Distance2Mul => d0 * d1,
            EdgeFunction::Distance2Div => {
                if d1 > 0.0 {
                    d0 / d1
                } else {
                    1.0
                }
            }
        }
    }
}

/// Result of a nearest-two search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSample {
    /// Distance to the nearest feature point.
    pub d0: f32,
    /// Distance to the second nearest feature point.
    pub d1: f32,
    /// Lattice coordinates of the nearest cell.
    pub cell_x: i32,
    pub cell_y: i32,
}

/// Find the two nearest feature points to `(x, y)` in lattice space.
pub fn nearest_two(
    seed: i32,
    x: f64,
    y: f64,
    jitter: f32,
    distance: DistanceFunction,
) -> CellSample {
    let xr = x.round() as i32;
    let yr = y.round() as i32;
    let jitter = jitter.clamp(0.0, 1.0) * MAX_JITTER;

    let mut sample = CellSample {
        d0: f32::MAX,
        d1: f32::MAX,
        cell_x: xr,
        cell_y: yr,
    };

    for cx in xr - 1..=xr + 1 {
        for cy in yr - 1..=yr + 1 {
            let (jx, jy) = jitter_vector(hash2(seed, cx, cy), jitter);
            let dx = (cx as f64 - x) as f32 + jx;
            let dy = (cy as f64 - y) as f32 + jy;
            let d = distance.apply(dx, dy);
            if d < sample.d0 {
                sample.d1 = sample.d0;
                sample.d0 = d;
                sample.cell_x = cx;
                sample.cell_y = cy;
            } else if d < sample.d1 {
                sample.d1 = d;
            }
        }
    }
    sample
}

/// Stable identity of a lattice cell in `[0, 1]`.
#[inline]
pub fn cell_identity(seed: i32, cell_x: i32, cell_y: i32) -> f32 {
    unit2(seed ^ IDENTITY_SALT, cell_x, cell_y)
}

#[inline]
fn jitter_vector(hash: u32, jitter: f32) -> (f32, f32) {
    let jx = (hash & 0xffff) as f32 / 65535.0 - 0.5;
    let jy = (hash >> 16) as f32 / 65535.0 - 0.5;
    (jx * 2.0 * jitter, jy * 2.0 * jitter)
}

/// What a [`Cellular`] source emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellOutput {
    /// Identity of the nearest cell.
    Value,
    /// Distance to the nearest feature point.
    Distance,
    Edge(EdgeFunction),
}

/// Cellular noise source.
#[derive(Clone, Debug)]
pub struct Cellular {
    seed: i32,
    frequency: f64,
    jitter: f32,
    distance: DistanceFunction,
    output: CellOutput,
}

impl Cellular {
    pub fn new(
        seed: i32,
        frequency: f64,
        jitter: f32,
        distance: DistanceFunction,
        output: CellOutput,
    ) -> Self {
        Self {
            seed,
            frequency,
            jitter,
            distance,
            output,
        }
    }

    pub fn sample(&self, x: f64, y: f64) -> CellSample {
        nearest_two(
            self.seed,
            x * self.frequency,
            y * self.frequency,
            self.jitter,
            self.distance,
        )
    }
}

impl Module for Cellular {
    fn get(&self, x: f64, y: f64) -> f32 {
        let sample = self.sample(x, y);
        match self.output {
            CellOutput::Value => cell_identity(self.seed, sample.cell_x, sample.cell_y),
            CellOutput::Distance => sample.d0.clamp(0.0, 1.0),
            CellOutput::Edge(edge) => edge.apply(sample.d0, sample.d1).clamp(0.0, 1.0),
        }
    }
}
