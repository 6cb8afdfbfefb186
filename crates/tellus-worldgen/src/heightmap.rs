//! Base elevation: continent shape plus blended landform regions.
//!
//! A low-frequency continent field decides between deep ocean, shallow ocean,
//! the coastal shelf, beaches and inland terrain. Inland points take their
//! height from the landform assigned to their region, blended toward the
//! border landform near region edges.

use tellus_config::{Config, ContinentConfig, Landform};

use crate::cell::Cell;
use crate::error::WorldgenError;
use crate::levels::Levels;
use crate::noise::{self, Noise, lerp, ramp};
use crate::populator::{
    Landforms, Populator, RegionLerper, RegionSelector, TerrainPopulator, TerrainProvider,
};
use crate::region::RegionClassifier;
use crate::seed::Seed;
use crate::terrain::{Terrain, Terrains};

const CONTINENT_LOW: f32 = 0.25;
const CONTINENT_HIGH: f32 = 0.75;

type Land = RegionLerper<RegionSelector<TerrainPopulator>, TerrainPopulator>;

pub struct Heightmap {
    levels: Levels,
    shape: ContinentConfig,
    continent: Noise,
    regions: RegionClassifier,
    land: Land,
    deep_ocean: TerrainPopulator,
    ocean: TerrainPopulator,
    beach_height: f32,
    coast: Terrain,
    beach: Terrain,
}

impl Heightmap {
    /// Registers every landform (and blended pair) in `terrains`.
    ///
    /// # Errors
    ///
    /// Fails on misordered continent thresholds, when every landform weight
    /// is zero, or when a weight is negative or not finite.
    pub fn new(
        seed: &mut Seed,
        levels: Levels,
        config: &Config,
        terrains: &mut Terrains,
    ) -> Result<Self, WorldgenError> {
        let shape = config.continent.clone();
        if !(shape.deep_ocean <= shape.shallow_ocean
            && shape.shallow_ocean <= shape.coast
            && shape.coast <= shape.inland)
        {
            return Err(WorldgenError::InvalidSettings(format!(
                "continent thresholds must be ordered, got {} / {} / {} / {}",
                shape.deep_ocean, shape.shallow_ocean, shape.coast, shape.inland
            )));
        }

        let scale = shape.scale.max(1) as f64;
        // Fractal output clusters around 0.5; stretch it so thresholds spread out.
        let continent = noise::perlin(seed.next(), scale, 4)
            .curve(|v| ramp(v, CONTINENT_LOW, CONTINENT_HIGH))
            .warp(seed, scale / 2.0, 2, scale / 4.0);

        let terrain = &config.terrain;
        let regions = RegionClassifier::new(
            seed,
            terrain.region_size,
            terrain.region_warp_scale,
            terrain.region_warp_strength,
            terrain.region_jitter,
        );
        let land = build_land(seed, levels, config, terrains)?;

        let deep_ocean = TerrainPopulator::new(
            terrains.deep_ocean,
            noise::perlin(seed.next(), 500.0, 3).map(levels.water(-48.0), levels.water(-28.0)),
        );
        let ocean = TerrainPopulator::new(
            terrains.ocean,
            noise::perlin(seed.next(), 300.0, 3).map(levels.water(-20.0), levels.water(-8.0)),
        );

        Ok(Self {
            levels,
            shape,
            continent,
            regions,
            land,
            deep_ocean,
            ocean,
            beach_height: levels.ground,
            coast: terrains.coast,
            beach: terrains.beach,
        })
    }

    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    /// Fill `region`, `region_edge`, `continent`, `value` and `tag`.
    pub fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        self.regions.apply(cell, x, z);
        let c = self.continent.get(x, z);
        cell.continent = c;
        let shape = &self.shape;

        if c >= shape.inland {
            self.land.apply(cell, x, z);
            self.land.tag(cell, x, z);
            return;
        }

        if c < shape.deep_ocean {
            self.deep_ocean.apply(cell, x, z);
            self.deep_ocean.tag(cell, x, z);
            return;
        }

        if c < shape.shallow_ocean {
            let alpha = ramp(c, shape.deep_ocean, shape.shallow_ocean);
            self.deep_ocean.apply(cell, x, z);
            let deep = cell.value;
            self.ocean.apply(cell, x, z);
            cell.value = lerp(deep, cell.value, alpha);
            if alpha < 0.5 {
                self.deep_ocean.tag(cell, x, z);
            } else {
                self.ocean.tag(cell, x, z);
            }
            return;
        }

        if c < shape.coast {
            let alpha = ramp(c, shape.shallow_ocean, shape.coast);
            self.ocean.apply(cell, x, z);
            cell.value = lerp(cell.value, self.beach_height, alpha);
            if cell.value < self.levels.water {
                self.ocean.tag(cell, x, z);
            } else {
                cell.tag = self.coast;
            }
            return;
        }

        let alpha = ramp(c, shape.coast, shape.inland);
        self.land.apply(cell, x, z);
        cell.value = lerp(self.beach_height, cell.value, alpha);
        if alpha < 0.5 {
            cell.tag = self.beach;
        } else {
            self.land.tag(cell, x, z);
        }
    }
}

fn build_land(
    seed: &mut Seed,
    levels: Levels,
    config: &Config,
    terrains: &mut Terrains,
) -> Result<Land, WorldgenError> {
    let landforms = Landforms::new(levels, &config.terrain);
    let weights = &config.terrain.weights;
    let mut provider = TerrainProvider::new(config.terrain.region_size);
    let mut border = None;

    for landform in Landform::ALL {
        let weight = weights.get(landform);
        let is_border = landform == config.terrain.border;
        if weight == 0.0 && !is_border {
            continue;
        }

        let terrain = terrains.register_landform(landform.name(), weight)?;
        let populator = TerrainPopulator::new(terrain, landforms.noise(landform, seed));
        if is_border {
            border = Some(populator.clone());
        }
        if weight == 0.0 {
            continue;
        }
        if landform.mixable() {
            provider.register_mixable(populator);
        } else {
            provider.register_unmixable(populator);
        }
    }

    let populators = provider.populators(terrains, seed);
    let selector = RegionSelector::new(populators)?;
    let border = border.ok_or_else(|| {
        WorldgenError::InvalidSettings("border landform was not registered".to_string())
    })?;
    tracing::debug!(
        slots = selector.len(),
        border = config.terrain.border.name(),
        "landform regions ready"
    );
    Ok(RegionLerper::new(selector, border))
}
