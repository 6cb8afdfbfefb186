//! Whittaker diagram: maps (temperature, moisture) pairs to biome types.

use crate::cell::BiomeType;

/// A rectangle in temperature-moisture space.
#[derive(Clone, Debug)]
pub struct WhittakerRegion {
    /// Minimum temperature (inclusive).
    pub temp_min: f32,
    /// Maximum temperature (exclusive).
    pub temp_max: f32,
    /// Minimum moisture (inclusive).
    pub moisture_min: f32,
    /// Maximum moisture (exclusive).
    pub moisture_max: f32,
    pub biome: BiomeType,
}

impl WhittakerRegion {
    const fn new(t: (f32, f32), m: (f32, f32), biome: BiomeType) -> Self {
        Self {
            temp_min: t.0,
            temp_max: t.1,
            moisture_min: m.0,
            moisture_max: m.1,
            biome,
        }
    }
}

/// Ordered lookup table; first match wins.
#[derive(Clone, Debug)]
pub struct WhittakerDiagram {
    pub regions: Vec<WhittakerRegion>,
    /// Used when no region matches.
    pub fallback: BiomeType,
}

// Upper bounds sit just past 1.0 so the closed unit square is covered.
const TOP: f32 = 1.001;

impl WhittakerDiagram {
    pub fn lookup(&self, temperature: f32, moisture: f32) -> BiomeType {
        self.regions
            .iter()
            .find(|r| {
                temperature >= r.temp_min
                    && temperature < r.temp_max
                    && moisture >= r.moisture_min
                    && moisture < r.moisture_max
            })
            .map_or(self.fallback, |r| r.biome)
    }
}

impl Default for WhittakerDiagram {
    fn default() -> Self {
        use BiomeType::*;
        Self {
            regions: vec![
                WhittakerRegion::new((0.0, 0.2), (0.0, 0.5), Tundra),
                WhittakerRegion::new((0.0, 0.2), (0.5, TOP), Taiga),
                WhittakerRegion::new((0.2, 0.45), (0.0, 0.3), ColdSteppe),
                WhittakerRegion::new((0.2, 0.45), (0.3, 0.7), Grassland),
                WhittakerRegion::new((0.2, 0.45), (0.7, TOP), Taiga),
                WhittakerRegion::new((0.45, 0.7), (0.0, 0.25), Steppe),
                WhittakerRegion::new((0.45, 0.7), (0.25, 0.55), Grassland),
                WhittakerRegion::new((0.45, 0.7), (0.55, 0.8), TemperateForest),
                WhittakerRegion::new((0.45, 0.7), (0.8, TOP), TemperateRainforest),
                WhittakerRegion::new((0.7, TOP), (0.0, 0.3), Desert),
                WhittakerRegion::new((0.7, TOP), (0.3, 0.6), Savanna),
                WhittakerRegion::new((0.7, TOP), (0.6, TOP), TropicalRainforest),
            ],
            fallback: Grassland,
        }
    }
}
