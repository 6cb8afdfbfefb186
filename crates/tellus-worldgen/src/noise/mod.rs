//! Composable 2D noise graph.
//!
//! Leaf sources wrap the `noise` crate's fractal generators (plus a seeded
//! cellular source) and normalize their output to `[0, 1]`. Combinators
//! consume a [`Noise`] and return a new one, so a field is described by a
//! builder chain such as `perlin(..).warp(..).scale(0.4).bias(ground)`.
//! Graphs are immutable once built and shared between threads via `Arc`.

mod cellular;
mod source;

use std::sync::Arc;

use crate::seed::Seed;

pub use cellular::{
    CellOutput, CellSample, Cellular, DistanceFunction, EdgeFunction, cell_identity, nearest_two,
};
pub use source::{billow, cell_distance, cell_edge, cell_value, constant, perlin, ridge};

/// A 2D scalar field.
pub trait Module: Send + Sync {
    fn get(&self, x: f64, y: f64) -> f32;
}

/// Shared handle to a node in a noise graph.
#[derive(Clone)]
pub struct Noise(Arc<dyn Module>);

impl Noise {
    pub fn new(module: impl Module + 'static) -> Self {
        Self(Arc::new(module))
    }

    #[inline]
    pub fn get(&self, x: f64, y: f64) -> f32 {
        self.0.get(x, y)
    }

    /// Apply `f` to every output value.
    pub fn curve(self, f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Noise {
        Noise::new(Curve { source: self, f })
    }

    pub fn scale(self, scale: f32) -> Noise {
        self.curve(move |v| v * scale)
    }

    pub fn bias(self, bias: f32) -> Noise {
        self.curve(move |v| v + bias)
    }

    pub fn clamp(self, min: f32, max: f32) -> Noise {
        self.curve(move |v| v.clamp(min, max))
    }

    /// Remap `[0, 1]` onto `[min, max]`.
    pub fn map(self, min: f32, max: f32) -> Noise {
        self.curve(move |v| min + v * (max - min))
    }

    /// Fade the field toward `1` as `alpha` drops toward `0`.
    pub fn alpha(self, alpha: f32) -> Noise {
        self.curve(move |v| v * alpha + (1.0 - alpha))
    }

    pub fn pow(self, power: f32) -> Noise {
        self.curve(move |v| libm::powf(v.max(0.0), power))
    }

    pub fn invert(self) -> Noise {
        self.curve(|v| 1.0 - v)
    }

    pub fn add(self, other: Noise) -> Noise {
        Noise::new(Zip::new(self, other, |a, b| a + b))
    }

    pub fn mult(self, other: Noise) -> Noise {
        Noise::new(Zip::new(self, other, |a, b| a * b))
    }

    pub fn max(self, other: Noise) -> Noise {
        Noise::new(Zip::new(self, other, f32::max))
    }

    pub fn min(self, other: Noise) -> Noise {
        Noise::new(Zip::new(self, other, f32::min))
    }

    /// Use this field to blend from `lower` to `upper`.
    ///
    /// Below `midpoint - range / 2` the result is `lower`, above
    /// `midpoint + range / 2` it is `upper`, linear in between.
    pub fn blend(self, lower: Noise, upper: Noise, midpoint: f32, range: f32) -> Noise {
        Noise::new(Blend {
            control: self,
            lower,
            upper,
            midpoint,
            range,
        })
    }

    /// Displace sample coordinates by two perlin fields drawn from `seed`.
    pub fn warp(self, seed: &mut Seed, scale: f64, octaves: usize, strength: f64) -> Noise {
        Noise::new(Warped {
            source: self,
            warp: Warp::new(seed, scale, octaves, strength),
        })
    }

    /// Multiply sample coordinates.
    pub fn freq(self, fx: f64, fy: f64) -> Noise {
        Noise::new(Freq {
            source: self,
            fx,
            fy,
        })
    }
}

impl std::fmt::Debug for Noise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Noise")
    }
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a + (b - a) * alpha
}

/// Where `value` falls between `min` and `max`, clamped to `[0, 1]`.
#[inline]
pub fn ramp(value: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return if value >= max { 1.0 } else { 0.0 };
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

struct Curve<F> {
    source: Noise,
    f: F,
}

impl<F> Module for Curve<F>
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    #[inline]
    fn get(&self, x: f64, y: f64) -> f32 {
        (self.f)(self.source.get(x, y))
    }
}

struct Zip<F> {
    a: Noise,
    b: Noise,
    f: F,
}

impl<F> Zip<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn new(a: Noise, b: Noise, f: F) -> Self {
        Self { a, b, f }
    }
}

impl<F> Module for Zip<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    #[inline]
    fn get(&self, x: f64, y: f64) -> f32 {
        (self.f)(self.a.get(x, y), self.b.get(x, y))
    }
}

struct Blend {
    control: Noise,
    lower: Noise,
    upper: Noise,
    midpoint: f32,
    range: f32,
}

impl Module for Blend {
    fn get(&self, x: f64, y: f64) -> f32 {
        let start = self.midpoint - self.range * 0.5;
        let alpha = ramp(self.control.get(x, y), start, start + self.range);
        if alpha <= 0.0 {
            return self.lower.get(x, y);
        }
        if alpha >= 1.0 {
            return self.upper.get(x, y);
        }
        lerp(self.lower.get(x, y), self.upper.get(x, y), alpha)
    }
}

struct Freq {
    source: Noise,
    fx: f64,
    fy: f64,
}

impl Module for Freq {
    #[inline]
    fn get(&self, x: f64, y: f64) -> f32 {
        self.source.get(x * self.fx, y * self.fy)
    }
}

/// Domain warp: offsets coordinates by two independent noise fields.
#[derive(Clone, Debug)]
pub struct Warp {
    x: Noise,
    y: Noise,
    strength: f64,
}

impl Warp {
    pub fn new(seed: &mut Seed, scale: f64, octaves: usize, strength: f64) -> Self {
        Self {
            x: perlin(seed.next(), scale, octaves),
            y: perlin(seed.next(), scale, octaves),
            strength,
        }
    }

    /// The warped position of `(x, y)`, displaced by at most `strength`.
    #[inline]
    pub fn displace(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = (self.x.get(x, y) as f64 - 0.5) * 2.0 * self.strength;
        let dy = (self.y.get(x, y) as f64 - 0.5) * 2.0 * self.strength;
        (x + dx, y + dy)
    }
}

struct Warped {
    source: Noise,
    warp: Warp,
}

impl Module for Warped {
    #[inline]
    fn get(&self, x: f64, y: f64) -> f32 {
        let (wx, wy) = self.warp.displace(x, y);
        self.source.get(wx, wy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_range(noise: &Noise) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for x in 0..64 {
            for y in 0..64 {
                let v = noise.get(x as f64 * 7.3, y as f64 * 5.1);
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min, max)
    }

    #[test]
    fn test_sources_normalized() {
        let mut seed = Seed::new(1);
        let sources = [
            perlin(seed.next(), 64.0, 4),
            ridge(seed.next(), 64.0, 4),
            billow(seed.next(), 64.0, 3),
            cell_value(seed.next(), 32.0, 0.8),
            cell_edge(seed.next(), 32.0, 0.8, EdgeFunction::Distance2Sub),
            cell_distance(seed.next(), 32.0, 0.8),
        ];
        for (i, source) in sources.iter().enumerate() {
            let (min, max) = sample_range(source);
            assert!(min >= 0.0 && max <= 1.0, "source {i} out of range: {min}..{max}");
            assert!(max > min, "source {i} is constant");
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_curves() {
        let n = constant(0.5);
        assert!(approx(n.clone().scale(0.5).bias(0.1).get(0.0, 0.0), 0.35));
        assert!(approx(n.clone().map(0.2, 0.4).get(0.0, 0.0), 0.3));
        assert!(approx(n.clone().invert().get(3.0, 4.0), 0.5));
        assert!(approx(n.clone().alpha(0.0).get(0.0, 0.0), 1.0));
        assert!(approx(n.clone().pow(2.0).get(0.0, 0.0), 0.25));
        assert_eq!(n.bias(2.0).clamp(0.0, 1.0).get(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_zip_ops() {
        let a = constant(0.25);
        let b = constant(0.5);
        assert_eq!(a.clone().add(b.clone()).get(0.0, 0.0), 0.75);
        assert_eq!(a.clone().mult(b.clone()).get(0.0, 0.0), 0.125);
        assert_eq!(a.clone().max(b.clone()).get(0.0, 0.0), 0.5);
        assert_eq!(a.min(b).get(0.0, 0.0), 0.25);
    }

    #[test]
    fn test_blend_band() {
        let lower = constant(0.0);
        let upper = constant(1.0);
        let at = |c: f32| {
            constant(c)
                .blend(lower.clone(), upper.clone(), 0.5, 0.25)
                .get(0.0, 0.0)
        };
        assert_eq!(at(0.2), 0.0);
        assert_eq!(at(0.8), 1.0);
        assert!((at(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_warp_is_deterministic() {
        let build = || perlin(5, 100.0, 3).warp(&mut Seed::new(9), 50.0, 2, 30.0);
        let a = build();
        let b = build();
        for i in 0..32 {
            let (x, y) = (i as f64 * 13.7, i as f64 * -4.1);
            assert_eq!(a.get(x, y), b.get(x, y));
        }
    }

    #[test]
    fn test_warp_displacement_bounded() {
        let warp = Warp::new(&mut Seed::new(3), 40.0, 2, 10.0);
        for i in 0..100 {
            let (x, y) = (i as f64 * 3.3, i as f64 * 1.7);
            let (wx, wy) = warp.displace(x, y);
            assert!((wx - x).abs() <= 10.0 && (wy - y).abs() <= 10.0);
        }
    }

    #[test]
    fn test_freq() {
        let n = perlin(1, 10.0, 1);
        assert_eq!(n.clone().freq(2.0, 2.0).get(3.0, 4.0), n.get(6.0, 8.0));
    }

    #[test]
    fn test_ramp() {
        assert_eq!(ramp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(ramp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(ramp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(ramp(0.5, 0.5, 0.5), 1.0);
        assert_eq!(ramp(0.4, 0.5, 0.5), 0.0);
    }
}
