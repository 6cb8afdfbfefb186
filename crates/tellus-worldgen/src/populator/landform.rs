use tellus_config::{Landform, TerrainConfig};

use crate::levels::Levels;
use crate::noise::{self, Noise, lerp, ramp};
use crate::seed::Seed;

/// Builds the height graph for each landform.
///
/// Shapes are designed in `[0, 1]` and then stretched over the range from
/// ground level to the top of the world, scaled by the configured vertical
/// scale. Horizontal scale multiplies every feature size.
#[derive(Clone, Copy, Debug)]
pub struct Landforms {
    levels: Levels,
    horizontal: f64,
    vertical: f32,
}

impl Landforms {
    pub fn new(levels: Levels, config: &TerrainConfig) -> Self {
        Self {
            levels,
            horizontal: config.horizontal_scale.max(0.01) as f64,
            vertical: config.vertical_scale.max(0.0),
        }
    }

    /// Height graph for `landform`, in normalized world units.
    pub fn noise(&self, landform: Landform, seed: &mut Seed) -> Noise {
        let range = (1.0 - self.levels.ground) * self.vertical;
        self.shape(landform, seed)
            .scale(range)
            .bias(self.levels.ground)
            .clamp(0.0, 1.0)
    }

    fn shape(&self, landform: Landform, seed: &mut Seed) -> Noise {
        let s = self.horizontal;
        match landform {
            Landform::Steppe => noise::perlin(seed.next(), 600.0 * s, 4)
                .warp(seed, 300.0 * s, 2, 120.0 * s)
                .scale(0.12),
            Landform::Plains => noise::perlin(seed.next(), 800.0 * s, 3)
                .warp(seed, 400.0 * s, 2, 200.0 * s)
                .scale(0.18),
            Landform::Hills => noise::perlin(seed.next(), 300.0 * s, 4)
                .mult(noise::perlin(seed.next(), 700.0 * s, 2).alpha(0.5))
                .warp(seed, 200.0 * s, 2, 80.0 * s)
                .scale(0.38),
            Landform::Dales => noise::billow(seed.next(), 350.0 * s, 3)
                .warp(seed, 200.0 * s, 2, 100.0 * s)
                .pow(1.5)
                .scale(0.3),
            Landform::Plateau => noise::perlin(seed.next(), 500.0 * s, 3)
                .curve(|v| smoothstep(ramp(v, 0.4, 0.55)) * 0.75 + v * 0.2)
                .add(noise::perlin(seed.next(), 80.0 * s, 2).scale(0.05))
                .scale(0.55),
            Landform::Badlands => noise::ridge(seed.next(), 220.0 * s, 4)
                .mult(noise::perlin(seed.next(), 500.0 * s, 2))
                .curve(|v| terrace(v, 5.0))
                .warp(seed, 120.0 * s, 2, 40.0 * s)
                .scale(0.5),
            Landform::Torridonian => noise::perlin(seed.next(), 400.0 * s, 4)
                .curve(|v| terrace(v, 4.0) * 0.85)
                .add(noise::ridge(seed.next(), 150.0 * s, 3).scale(0.15))
                .scale(0.5),
            Landform::Mountains => noise::ridge(seed.next(), 410.0 * s, 5)
                .warp(seed, 300.0 * s, 2, 150.0 * s)
                .mult(noise::perlin(seed.next(), 600.0 * s, 2).alpha(0.6))
                .scale(0.9),
            Landform::Volcano => noise::cell_distance(seed.next(), 900.0 * s, 0.7)
                .curve(volcano_profile)
                .max(noise::perlin(seed.next(), 300.0 * s, 3).scale(0.15))
                .scale(0.9),
        }
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Flat treads with steep risers.
#[inline]
fn terrace(v: f32, steps: f32) -> f32 {
    let scaled = v.clamp(0.0, 1.0) * steps;
    let floor = scaled.floor();
    let rise = scaled - floor;
    ((floor + rise * rise * rise * rise) / steps).clamp(0.0, 1.0)
}

/// Cone around a cell center with a crater at the top.
fn volcano_profile(distance: f32) -> f32 {
    let cone = (1.0 - distance / 0.45).clamp(0.0, 1.0);
    let crater = ramp(distance, 0.0, 0.06);
    cone * cone * lerp(0.6, 1.0, crater)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_landform_above_ground() {
        let levels = Levels::new(256, 63);
        let landforms = Landforms::new(levels, &TerrainConfig::default());
        let mut seed = Seed::new(11);
        for landform in Landform::ALL {
            let noise = landforms.noise(landform, &mut seed);
            for i in 0..100 {
                let v = noise.get(i as f64 * 41.0, i as f64 * -23.0);
                assert!(
                    v >= levels.ground && v <= 1.0,
                    "{} produced {v}",
                    landform.name()
                );
            }
        }
    }

    #[test]
    fn test_terrace_steps() {
        assert_eq!(terrace(0.0, 4.0), 0.0);
        assert_eq!(terrace(0.25, 4.0), 0.25);
        assert!((terrace(0.3, 4.0) - 0.25).abs() < 0.01);
        assert_eq!(terrace(1.0, 4.0), 1.0);
    }

    #[test]
    fn test_volcano_has_crater() {
        let rim = volcano_profile(0.06);
        let vent = volcano_profile(0.0);
        let flank = volcano_profile(0.3);
        assert!(vent < rim, "vent {vent} should sit below rim {rim}");
        assert!(flank < rim);
        assert_eq!(volcano_profile(0.9), 0.0);
    }
}
