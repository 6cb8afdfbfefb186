use super::TerrainPopulator;
use crate::noise::{self, Noise};
use crate::seed::Seed;
use crate::terrain::Terrains;

/// Control value at which a blended pair is half of each parent.
pub const BLEND_MIDPOINT: f32 = 0.5;
/// Width of the control band over which a blended pair transitions.
pub const BLEND_RANGE: f32 = 0.25;

/// Collects landform populators and expands mixable ones into blended pairs.
///
/// The final list is every unordered pair of mixable populators, then the
/// mixable populators themselves, then the unmixable ones.
pub struct TerrainProvider {
    region_size: u32,
    mixable: Vec<TerrainPopulator>,
    unmixable: Vec<TerrainPopulator>,
}

impl TerrainProvider {
    pub fn new(region_size: u32) -> Self {
        Self {
            region_size: region_size.max(2),
            mixable: Vec::new(),
            unmixable: Vec::new(),
        }
    }

    pub fn register_mixable(&mut self, populator: TerrainPopulator) {
        self.mixable.push(populator);
    }

    pub fn register_unmixable(&mut self, populator: TerrainPopulator) {
        self.unmixable.push(populator);
    }

    /// Blend two populators under a warped control field at half the region scale.
    pub fn combine(
        &self,
        a: &TerrainPopulator,
        b: &TerrainPopulator,
        terrains: &mut Terrains,
        seed: &mut Seed,
    ) -> TerrainPopulator {
        let scale = self.region_size as f64 / 2.0;
        let control = noise::perlin(seed.next(), scale, 1).warp(seed, scale / 2.0, 2, scale / 2.0);
        let source: Noise = control
            .blend(a.source().clone(), b.source().clone(), BLEND_MIDPOINT, BLEND_RANGE)
            .clamp(0.0, 1.0);
        TerrainPopulator::new(terrains.combine(a.terrain(), b.terrain()), source)
    }

    /// Consume the provider and return every populator a selector should use.
    pub fn populators(self, terrains: &mut Terrains, seed: &mut Seed) -> Vec<TerrainPopulator> {
        let mut result = Vec::new();
        for (i, a) in self.mixable.iter().enumerate() {
            for b in &self.mixable[i + 1..] {
                result.push(self.combine(a, b, terrains, seed));
            }
        }
        let mixed = result.len();
        result.extend(self.mixable);
        result.extend(self.unmixable);
        tracing::debug!(mixed, total = result.len(), "terrain populators assembled");
        result
    }
}
