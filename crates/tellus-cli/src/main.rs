//! The `tellus` binary: generate a square of tiles around the origin and
//! report what came out.

use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use hashbrown::HashMap;
use tellus_config::{CliArgs, Config};
use tellus_worldgen::{GeneratorContext, Tile, WorldGenerator, WorldgenError};
use tracing::info;

fn main() {
    let args = CliArgs::parse();

    // Load or create config, then apply CLI overrides
    let config_dir = args.config_dir();
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    tellus_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(config, args.tiles) {
        eprintln!("Generation failed: {e}");
        process::exit(1);
    }
}

fn run(config: Config, radius: u32) -> Result<(), WorldgenError> {
    let ctx = GeneratorContext::new(config)?;
    let generator = Arc::new(WorldGenerator::new(&ctx)?);

    let radius = radius as i32;
    let coords: Vec<(i32, i32)> = (-radius..=radius)
        .flat_map(|tz| (-radius..=radius).map(move |tx| (tx, tz)))
        .collect();

    let started = Instant::now();
    let tiles = generator.generate_tiles(&coords)?;
    info!(
        tiles = tiles.len(),
        threads = ctx.workers.size(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generation finished"
    );

    report(&generator, &tiles);
    Ok(())
}

#[derive(Debug)]
struct Range {
    min: f32,
    max: f32,
}

impl Range {
    fn new() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }

    fn add(&mut self, v: f32) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

fn report(generator: &WorldGenerator, tiles: &[Tile]) {
    let terrains = generator.terrains();
    let mut histogram: HashMap<&str, usize> = HashMap::new();
    let (mut value, mut moisture, mut temperature) = (Range::new(), Range::new(), Range::new());
    let mut total = 0;

    for cell in tiles.iter().flat_map(Tile::interior) {
        *histogram.entry(terrains.name(cell.tag)).or_default() += 1;
        value.add(cell.value);
        moisture.add(cell.moisture);
        temperature.add(cell.temperature);
        total += 1;
    }

    let mut counts: Vec<_> = histogram.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    for (name, count) in counts {
        let share = count as f64 * 100.0 / total.max(1) as f64;
        info!(terrain = name, cells = count, "{share:.1}%");
    }
    info!(min = value.min, max = value.max, "value range");
    info!(min = moisture.min, max = moisture.max, "moisture range");
    info!(min = temperature.min, max = temperature.max, "temperature range");
}
