//! Configuration structs with sensible defaults and RON persistence.
//!
//! Heights expressed in "blocks" are relative to sea level and converted to
//! normalized elevation by the generator's `Levels`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level world generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed and vertical extents.
    pub world: WorldConfig,
    /// Region partition and landform weights.
    pub terrain: TerrainConfig,
    /// Continent/ocean shaping.
    pub continent: ContinentConfig,
    /// Temperature, moisture and biome layout.
    pub climate: ClimateConfig,
    /// River network layout and channel shapes.
    pub rivers: RiverConfig,
    /// Neighborhood filters applied per tile.
    pub filters: FilterConfig,
    /// Climate-driven surface decorators.
    pub decorators: DecoratorConfig,
    /// Vertical material layers.
    pub geology: GeologyConfig,
    /// Worker pool and tiling.
    pub threads: ThreadConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World-wide constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Root seed every noise layer is derived from.
    pub seed: i64,
    /// Total column height in blocks.
    pub world_height: u32,
    /// Sea level in blocks.
    pub sea_level: u32,
}

/// The landform recipes a region can be assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Landform {
    Steppe,
    Plains,
    Hills,
    Dales,
    Plateau,
    Badlands,
    Torridonian,
    Mountains,
    Volcano,
}

impl Landform {
    /// Every landform, in registration order.
    pub const ALL: [Landform; 9] = [
        Landform::Steppe,
        Landform::Plains,
        Landform::Hills,
        Landform::Dales,
        Landform::Plateau,
        Landform::Badlands,
        Landform::Torridonian,
        Landform::Mountains,
        Landform::Volcano,
    ];

    /// Lower-case name used for terrain tags.
    pub fn name(self) -> &'static str {
        match self {
            Landform::Steppe => "steppe",
            Landform::Plains => "plains",
            Landform::Hills => "hills",
            Landform::Dales => "dales",
            Landform::Plateau => "plateau",
            Landform::Badlands => "badlands",
            Landform::Torridonian => "torridonian",
            Landform::Mountains => "mountains",
            Landform::Volcano => "volcano",
        }
    }

    /// Whether this landform takes part in pairwise combination.
    pub fn mixable(self) -> bool {
        !matches!(self, Landform::Volcano)
    }
}

/// Relative selection weight per landform. A weight of zero disables it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LandformWeights {
    pub steppe: f32,
    pub plains: f32,
    pub hills: f32,
    pub dales: f32,
    pub plateau: f32,
    pub badlands: f32,
    pub torridonian: f32,
    pub mountains: f32,
    pub volcano: f32,
}

impl LandformWeights {
    /// Weight configured for `landform`.
    pub fn get(&self, landform: Landform) -> f32 {
        match landform {
            Landform::Steppe => self.steppe,
            Landform::Plains => self.plains,
            Landform::Hills => self.hills,
            Landform::Dales => self.dales,
            Landform::Plateau => self.plateau,
            Landform::Badlands => self.badlands,
            Landform::Torridonian => self.torridonian,
            Landform::Mountains => self.mountains,
            Landform::Volcano => self.volcano,
        }
    }
}

/// Region partition and landform selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Average region diameter in blocks.
    pub region_size: u32,
    /// Scale of the region domain warp in blocks.
    pub region_warp_scale: u32,
    /// Displacement of the region domain warp in blocks.
    pub region_warp_strength: f32,
    /// Jitter of region cell centers, in `[0, 1]`.
    pub region_jitter: f32,
    /// Multiplier on every landform's horizontal scale.
    pub horizontal_scale: f32,
    /// Multiplier on every landform's height above ground.
    pub vertical_scale: f32,
    /// Landform blended in across region boundaries.
    pub border: Landform,
    /// Selection weights.
    pub weights: LandformWeights,
}

/// Continent/ocean thresholds over the continent field `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContinentConfig {
    /// Continent noise scale in blocks.
    pub scale: u32,
    /// Below this the floor is deep ocean.
    pub deep_ocean: f32,
    /// Below this the floor is shallow ocean.
    pub shallow_ocean: f32,
    /// Below this the surface is coast.
    pub coast: f32,
    /// Above this the surface is fully inland terrain.
    pub inland: f32,
}

/// Climate layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimateConfig {
    /// Temperature noise scale in blocks.
    pub temperature_scale: u32,
    /// Moisture noise scale in blocks.
    pub moisture_scale: u32,
    /// Added to temperature before clamping, in `[-1, 1]`.
    pub temperature_bias: f32,
    /// Added to moisture before clamping, in `[-1, 1]`.
    pub moisture_bias: f32,
    /// Average biome cell diameter in blocks.
    pub biome_size: u32,
    /// Biome cell domain warp strength in blocks.
    pub biome_warp_strength: f32,
    /// Temperature lost between sea level and the top of the world.
    pub lapse_rate: f32,
}

/// Shape of one class of river channel. Heights and widths in blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    /// Full width of the river bed in blocks.
    pub bed_width: f32,
    /// Full width of the banks in blocks, at least the bed width.
    pub bank_width: f32,
    /// Full width of the carved valley in blocks, at least the bank width.
    pub valley_width: f32,
    /// Bed depth below sea level.
    pub bed_depth: f32,
    /// Lowest bank height above sea level.
    pub min_bank_height: f32,
    /// Highest bank height above sea level.
    pub max_bank_height: f32,
    /// Fraction of the length over which the channel widens from its source.
    pub fade_in: f32,
    /// Fraction of the length over which the channel narrows before its end.
    pub fade_out: f32,
}

/// River network layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiverConfig {
    /// Disable to skip river carving entirely.
    pub enabled: bool,
    /// Side length of a river region in blocks.
    pub region_size: u32,
    /// Main rivers attempted per region.
    pub main_rivers: u32,
    /// Tributaries attempted per main river.
    pub tributaries: u32,
    /// Minimum source height above sea level, in blocks.
    pub min_source_height: f32,
    /// Scale of the bank height variance noise in blocks.
    pub variance_scale: u32,
    /// Main channel shape.
    pub main: ChannelConfig,
    /// Tributary channel shape.
    pub tributary: ChannelConfig,
}

/// Droplet erosion parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErosionConfig {
    pub enabled: bool,
    /// Droplets simulated per tile.
    pub droplets: u32,
    /// Steps before a droplet evaporates.
    pub max_lifetime: u32,
    /// How much a droplet keeps its direction, in `[0, 1]`.
    pub inertia: f32,
    /// Sediment capacity multiplier.
    pub capacity: f32,
    pub erosion_rate: f32,
    pub deposit_rate: f32,
    pub evaporation: f32,
    pub gravity: f32,
    /// Radius of the erosion brush in cells.
    pub brush_radius: u32,
}

/// Box smoothing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub enabled: bool,
    pub iterations: u32,
    /// Kernel radius in cells.
    pub radius: u32,
    /// Blend between the original and smoothed value, in `[0, 1]`.
    pub strength: f32,
}

/// Steepness derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SteepnessConfig {
    /// Height delta, in blocks, that maps to full steepness.
    pub full_slope: f32,
}

/// Neighborhood filters, applied in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub erosion: ErosionConfig,
    pub smoothing: SmoothingConfig,
    pub steepness: SteepnessConfig,
}

/// Desert dunes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DunesConfig {
    pub enabled: bool,
    /// `temperature * (1 - moisture)` where dunes start.
    pub climate_min: f32,
    /// `temperature * (1 - moisture)` where dunes reach full height.
    pub climate_max: f32,
    /// Dune cell scale in blocks.
    pub scale: u32,
    /// Peak dune height in blocks.
    pub max_height: f32,
}

/// Swamp pools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwampConfig {
    pub enabled: bool,
    pub moisture_min: f32,
    pub temperature_min: f32,
    /// Height above sea level where pools start fading, in blocks.
    pub fade_start: f32,
    /// Height above sea level where pools have faded out, in blocks.
    pub fade_end: f32,
    /// Pool floor depth below sea level, in blocks.
    pub pool_depth: f32,
    /// Pool noise scale in blocks.
    pub scale: u32,
}

/// A band: zero below `min`, linear inside, one above `max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Ramp {
    pub min: f32,
    pub max: f32,
}

impl Default for Ramp {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// Riverside wetlands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WetlandsConfig {
    pub enabled: bool,
    pub temperature: Ramp,
    pub moisture: Ramp,
    /// Ramp over `1 - river_mask`.
    pub river: Ramp,
    /// Bank height above sea level, in blocks.
    pub bank_height: f32,
    /// Pool floor depth below sea level, in blocks.
    pub pool_depth: f32,
}

/// Decorators, applied in declaration order after filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecoratorConfig {
    pub dunes: DunesConfig,
    pub swamp: SwampConfig,
    pub wetlands: WetlandsConfig,
}

/// One vertical material layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StratumConfig {
    pub material: String,
    /// Depth noise scale in blocks.
    pub scale: u32,
    /// Relative depth range sampled from the noise.
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Default for StratumConfig {
    fn default() -> Self {
        Self {
            material: "stone".to_string(),
            scale: 400,
            min_depth: 0.1,
            max_depth: 1.0,
        }
    }
}

/// Vertical geology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeologyConfig {
    /// Number of distinct strata stacks spread across the world.
    pub variants: u32,
    /// Size of the area sharing one strata stack, in blocks.
    pub region_size: u32,
    /// Layers from the surface downwards.
    pub layers: Vec<StratumConfig>,
}

/// Worker pool and tiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThreadConfig {
    /// Worker threads; `0` uses every available core.
    pub worker_threads: usize,
    /// Tile side length in cells.
    pub tile_size: u32,
    /// Extra cells generated around a tile for neighborhood filters.
    pub tile_border: u32,
    /// Upper bound on tasks a single batch may hold.
    pub batch_capacity: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_height: 256,
            sea_level: 63,
        }
    }
}

impl Default for LandformWeights {
    fn default() -> Self {
        Self {
            steppe: 1.0,
            plains: 1.0,
            hills: 1.0,
            dales: 1.0,
            plateau: 1.0,
            badlands: 1.0,
            torridonian: 1.0,
            mountains: 2.0,
            volcano: 1.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            region_size: 1000,
            region_warp_scale: 400,
            region_warp_strength: 200.0,
            region_jitter: 0.9,
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            border: Landform::Plains,
            weights: LandformWeights::default(),
        }
    }
}

impl Default for ContinentConfig {
    fn default() -> Self {
        Self {
            scale: 3000,
            deep_ocean: 0.15,
            shallow_ocean: 0.28,
            coast: 0.34,
            inland: 0.42,
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            temperature_scale: 2400,
            moisture_scale: 1800,
            temperature_bias: 0.0,
            moisture_bias: 0.0,
            biome_size: 300,
            biome_warp_strength: 80.0,
            lapse_rate: 0.5,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            bed_width: 4.0,
            bank_width: 12.0,
            valley_width: 80.0,
            bed_depth: 4.0,
            min_bank_height: 1.0,
            max_bank_height: 8.0,
            fade_in: 0.2,
            fade_out: 0.0,
        }
    }
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            region_size: 2000,
            main_rivers: 3,
            tributaries: 2,
            min_source_height: 24.0,
            variance_scale: 200,
            main: ChannelConfig::default(),
            tributary: ChannelConfig {
                bed_width: 2.0,
                bank_width: 6.0,
                valley_width: 40.0,
                bed_depth: 2.0,
                min_bank_height: 1.0,
                max_bank_height: 5.0,
                fade_in: 0.3,
                fade_out: 0.0,
            },
        }
    }
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            droplets: 600,
            max_lifetime: 24,
            inertia: 0.05,
            capacity: 4.0,
            erosion_rate: 0.3,
            deposit_rate: 0.3,
            evaporation: 0.02,
            gravity: 4.0,
            brush_radius: 2,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            iterations: 1,
            radius: 1,
            strength: 0.5,
        }
    }
}

impl Default for SteepnessConfig {
    fn default() -> Self {
        Self { full_slope: 6.0 }
    }
}

impl Default for DunesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            climate_min: 0.6,
            climate_max: 0.85,
            scale: 80,
            max_height: 12.0,
        }
    }
}

impl Default for SwampConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            moisture_min: 0.7,
            temperature_min: 0.5,
            fade_start: 2.0,
            fade_end: 6.0,
            pool_depth: 2.0,
            scale: 48,
        }
    }
}

impl Default for WetlandsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            temperature: Ramp { min: 0.3, max: 0.6 },
            moisture: Ramp { min: 0.6, max: 0.8 },
            river: Ramp { min: 0.4, max: 0.9 },
            bank_height: 1.0,
            pool_depth: 1.0,
        }
    }
}

impl Default for GeologyConfig {
    fn default() -> Self {
        let layer = |material: &str, scale: u32, min_depth: f32, max_depth: f32| StratumConfig {
            material: material.to_string(),
            scale,
            min_depth,
            max_depth,
        };
        Self {
            variants: 4,
            region_size: 600,
            layers: vec![
                layer("soil", 60, 0.02, 0.06),
                layer("clay", 120, 0.0, 0.08),
                layer("sandstone", 300, 0.05, 0.25),
                layer("limestone", 300, 0.05, 0.3),
                layer("stone", 500, 0.2, 0.6),
                layer("deepslate", 500, 0.2, 0.5),
            ],
        }
    }
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            tile_size: 64,
            tile_border: 4,
            batch_capacity: 256,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

const FILE_NAME: &str = "config.ron";

fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if it does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default settings to {}", path.display());
            return Ok(config);
        }

        let config = read_file(&path)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Persist these settings as `config_dir/config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(FILE_NAME);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let encoded = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Encode)?;

        std::fs::write(&path, encoded).map_err(write_err)
    }

    /// Re-read the file; `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_file(&config_dir.join(FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Settings changed on disk");
        Ok(Some(fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("world_height: 256"));
        assert!(ron_str.contains("sea_level: 63"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `rivers` section entirely
        let ron_str = "(world: (seed: 42), terrain: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.sea_level, 63);
        assert_eq!(config.rivers, RiverConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_landform_enum_parses_by_name() {
        let ron_str = "(terrain: (border: Steppe, weights: (volcano: 0.0)))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.terrain.border, Landform::Steppe);
        assert_eq!(config.terrain.weights.get(Landform::Volcano), 0.0);
        assert_eq!(config.terrain.weights.get(Landform::Mountains), 2.0);
    }

    #[test]
    fn test_only_volcano_is_unmixable() {
        let unmixable: Vec<_> = Landform::ALL.iter().filter(|l| !l.mixable()).collect();
        assert_eq!(unmixable, vec![&Landform::Volcano]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = -7;
        config.threads.worker_threads = 3;
        config.geology.layers.truncate(2);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.climate.moisture_bias = 0.25;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().climate.moisture_bias, 0.25);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(world: [").unwrap();

        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), Some(dir.path().join("config.ron").as_path()));
        assert!(err.to_string().contains("config.ron"));
    }

    #[test]
    fn test_reload_of_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
