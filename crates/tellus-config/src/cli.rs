//! Command-line argument parsing for the `tellus` tool.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

const APP_NAME: &str = "tellus";

/// Tellus command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tellus", about = "Deterministic terrain field generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// Worker threads (0 = one per core).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Tile radius around the origin to generate.
    #[arg(long, default_value_t = 2)]
    pub tiles: u32,

    /// Tile side length in cells.
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// The config directory to use: `--config` if given, else the OS default.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config.clone().or_else(default_config_dir)
    }
}

/// `<os config dir>/tellus`, if the OS exposes a config directory.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(threads) = args.threads {
            self.threads.worker_threads = threads;
        }
        if let Some(size) = args.tile_size {
            self.threads.tile_size = size;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
