//! Settings bundle for Tellus world generation.
//!
//! Every knob the generator reads lives here and persists to disk as a RON
//! file. Supports CLI overrides via clap, hot-reload detection, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, default_config_dir};
pub use config::{
    ChannelConfig, ClimateConfig, Config, ContinentConfig, DebugConfig, DecoratorConfig,
    DunesConfig, ErosionConfig, FilterConfig, GeologyConfig, Landform, LandformWeights, Ramp,
    RiverConfig, SmoothingConfig, SteepnessConfig, StratumConfig, SwampConfig, TerrainConfig,
    ThreadConfig, WetlandsConfig, WorldConfig,
};
pub use error::ConfigError;
