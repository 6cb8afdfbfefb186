//! Climate: temperature, moisture and biome cells.
//!
//! The plane is split into warped climate cells (the same classifier used for
//! terrain regions, at biome scale). Temperature and moisture are sampled
//! mostly at the cell's center so each cell reads as one coherent climate,
//! blending toward the local value near cell borders. Temperature then drops
//! with elevation.

mod diagram;

pub use diagram::{WhittakerDiagram, WhittakerRegion};

use tellus_config::ClimateConfig;

use crate::cell::Cell;
use crate::levels::Levels;
use crate::noise::{self, Noise, lerp};
use crate::region::RegionClassifier;
use crate::seed::Seed;

/// How far toward the local climate value a cell border reaches.
const BORDER_BLEND: f32 = 0.5;

pub struct Climate {
    levels: Levels,
    biomes: RegionClassifier,
    temperature: Noise,
    moisture: Noise,
    temperature_bias: f32,
    moisture_bias: f32,
    lapse_rate: f32,
    diagram: WhittakerDiagram,
}

impl Climate {
    pub fn new(seed: &mut Seed, levels: Levels, config: &ClimateConfig) -> Self {
        let biomes = RegionClassifier::new(
            seed,
            config.biome_size,
            (config.biome_size / 2).max(1),
            config.biome_warp_strength,
            0.9,
        );
        let temperature = noise::perlin(seed.next(), config.temperature_scale as f64, 3);
        let moisture = noise::perlin(seed.next(), config.moisture_scale as f64, 3)
            .warp(seed, config.moisture_scale as f64 / 2.0, 2, config.moisture_scale as f64 / 4.0);
        Self {
            levels,
            biomes,
            temperature,
            moisture,
            temperature_bias: config.temperature_bias,
            moisture_bias: config.moisture_bias,
            lapse_rate: config.lapse_rate,
            diagram: WhittakerDiagram::default(),
        }
    }

    /// Replace the biome lookup table.
    pub fn with_diagram(mut self, diagram: WhittakerDiagram) -> Self {
        self.diagram = diagram;
        self
    }

    /// Fill the climate fields of `cell`. Expects `cell.value` to be set.
    pub fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        let biome = self.biomes.classify(x, z);
        cell.biome = biome.identity;
        cell.biome_edge = biome.edge;
        cell.biome_mask = 1.0 - biome.edge;

        let (cx, cz) = self.biomes.center(&biome);
        let alpha = biome.edge * BORDER_BLEND;
        let temperature = lerp(self.temperature.get(cx, cz), self.temperature.get(x, z), alpha);
        let moisture = lerp(self.moisture.get(cx, cz), self.moisture.get(x, z), alpha);

        let lapse = self.lapse_rate * self.levels.elevation(cell.value);
        cell.temperature = (temperature + self.temperature_bias - lapse).clamp(0.0, 1.0);
        cell.moisture = (moisture + self.moisture_bias).clamp(0.0, 1.0);
        cell.biome_type = self.diagram.lookup(cell.temperature, cell.moisture);
    }
}
