//! Leaf noise sources, all normalized to `[0, 1]`.

use noise::{Billow, Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti};

use super::cellular::{CellOutput, Cellular, DistanceFunction, EdgeFunction};
use super::{Module, Noise};

/// Wraps a `noise` crate generator and rescales `[-1, 1]` to `[0, 1]`.
struct Fractal<N>(N);

impl<N> Module for Fractal<N>
where
    N: NoiseFn<f64, 2> + Send + Sync,
{
    #[inline]
    fn get(&self, x: f64, y: f64) -> f32 {
        ((self.0.get([x, y]) + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }
}

struct Constant(f32);

impl Module for Constant {
    #[inline]
    fn get(&self, _x: f64, _y: f64) -> f32 {
        self.0
    }
}

fn frequency(scale: f64) -> f64 {
    1.0 / scale.max(1.0)
}

/// Fractal Brownian motion over perlin noise. `scale` is the feature size in blocks.
pub fn perlin(seed: i32, scale: f64, octaves: usize) -> Noise {
    let fbm = Fbm::<Perlin>::new(seed as u32)
        .set_octaves(octaves.max(1))
        .set_frequency(frequency(scale));
    Noise::new(Fractal(fbm))
}

/// Ridged multifractal: sharp crests, used for mountain ranges.
pub fn ridge(seed: i32, scale: f64, octaves: usize) -> Noise {
    let ridged = RidgedMulti::<Perlin>::new(seed as u32)
        .set_octaves(octaves.max(1))
        .set_frequency(frequency(scale));
    Noise::new(Fractal(ridged))
}

/// Billow noise: rounded lumps with creased valleys.
pub fn billow(seed: i32, scale: f64, octaves: usize) -> Noise {
    let billow = Billow::<Perlin>::new(seed as u32)
        .set_octaves(octaves.max(1))
        .set_frequency(frequency(scale));
    Noise::new(Fractal(billow))
}

pub fn constant(value: f32) -> Noise {
    Noise::new(Constant(value))
}

/// Per-cell identity of a jittered grid with cells `scale` blocks wide.
pub fn cell_value(seed: i32, scale: f64, jitter: f32) -> Noise {
    Noise::new(Cellular::new(
        seed,
        frequency(scale),
        jitter,
        DistanceFunction::Natural,
        CellOutput::Value,
    ))
}

/// Edge function of the two nearest cell centers, clamped to `[0, 1]`.
pub fn cell_edge(seed: i32, scale: f64, jitter: f32, edge: EdgeFunction) -> Noise {
    Noise::new(Cellular::new(
        seed,
        frequency(scale),
        jitter,
        DistanceFunction::Euclidean,
        CellOutput::Edge(edge),
    ))
}

/// Distance to the nearest cell center, clamped to `[0, 1]`.
pub fn cell_distance(seed: i32, scale: f64, jitter: f32) -> Noise {
    Noise::new(Cellular::new(
        seed,
        frequency(scale),
        jitter,
        DistanceFunction::Euclidean,
        CellOutput::Distance,
    ))
}
