//! End-to-end generation through the public API.

use std::sync::Arc;

use tellus_config::Config;
use tellus_worldgen::climate::WhittakerDiagram;
use tellus_worldgen::{BiomeType, Cell, GeneratorContext, TerrainKind, WorldGenerator};

fn config(seed: i64) -> Config {
    let mut config = Config::default();
    config.world.seed = seed;
    config.threads.worker_threads = 2;
    config.threads.tile_size = 16;
    config.threads.tile_border = 2;
    config.threads.batch_capacity = 3;
    config
}

fn generator(config: Config) -> Arc<WorldGenerator> {
    let ctx = GeneratorContext::new(config).unwrap();
    Arc::new(WorldGenerator::new(&ctx).unwrap())
}

fn points() -> impl Iterator<Item = (f64, f64)> {
    (0..40).map(|i| {
        let i = i as f64;
        (i * 523.0 - 9000.0, 7000.0 - i * 389.0)
    })
}

fn sample(generator: &WorldGenerator, x: f64, z: f64) -> Cell {
    let mut cell = Cell::default();
    generator.apply(&mut cell, x, z);
    cell
}

#[test]
fn test_same_seed_same_world() {
    let a = generator(config(99));
    let b = generator(config(99));
    for (x, z) in points() {
        assert_eq!(sample(&a, x, z), sample(&b, x, z), "diverged at {x},{z}");
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generator(config(1));
    let b = generator(config(2));
    let differing = points()
        .filter(|&(x, z)| sample(&a, x, z).value != sample(&b, x, z).value)
        .count();
    assert!(differing > 20, "only {differing} points differ");
}

#[test]
fn test_sampling_order_and_thread_do_not_matter() {
    let generator = generator(config(5));
    let expected: Vec<Cell> = points().map(|(x, z)| sample(&generator, x, z)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = Arc::clone(&generator);
            std::thread::spawn(move || {
                let mut reversed: Vec<Cell> = points()
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .map(|(x, z)| sample(&generator, x, z))
                    .collect();
                reversed.reverse();
                reversed
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_every_field_stays_normalised() {
    let generator = generator(config(77));
    for (x, z) in points() {
        let cell = sample(&generator, x, z);
        for (name, v) in [
            ("value", cell.value),
            ("continent", cell.continent),
            ("moisture", cell.moisture),
            ("temperature", cell.temperature),
            ("biome", cell.biome),
            ("biome_edge", cell.biome_edge),
            ("region", cell.region),
            ("region_edge", cell.region_edge),
            ("river_mask", cell.river_mask),
            ("steepness", cell.steepness),
        ] {
            assert!((0.0..=1.0).contains(&v), "{name} = {v} at {x},{z}");
        }
        assert_ne!(generator.terrains().name(cell.tag), "unknown");
    }
}

#[test]
fn test_parallel_tiles_match_sequential_tiles() {
    let generator = generator(config(11));
    let coords = [(0, 0), (-1, 0), (3, -2), (0, 1), (-4, -4), (2, 2), (1, -1)];
    let tiles = generator.generate_tiles(&coords).unwrap();
    assert_eq!(tiles.len(), coords.len());
    for (tile, &(tx, tz)) in tiles.iter().zip(&coords) {
        assert_eq!((tile.x(), tile.z()), (tx, tz));
        assert_eq!(*tile, generator.generate_tile(tx, tz));
    }
}

#[test]
fn test_empty_tile_request() {
    let generator = generator(config(11));
    assert!(generator.generate_tiles(&[]).unwrap().is_empty());
}

#[test]
fn test_lowland_at_origin_is_dry_land_without_river() {
    let generator = generator(config(42));
    let levels = *generator.levels();
    let elevated = sample(&generator, 0.0, 0.0);

    // Re-run climate and decoration with the surface pinned five blocks above
    // the sea. Rivers and regions do not depend on the sampled height.
    let mut cell = Cell::default();
    generator.heightmap(&mut cell, 0.0, 0.0);
    cell.value = levels.water(5.0);
    generator.climate().apply(&mut cell, 0.0, 0.0);
    generator.decorators().apply(&mut cell, 0.0, 0.0);

    assert_eq!(cell.river_mask, 1.0, "no river reaches the origin");
    assert!(
        (0.0..=0.5).contains(&cell.region_edge),
        "region edge {}",
        cell.region_edge
    );
    assert!(cell.value > levels.water, "pools must not flood the lowland");

    // "Dry" is read from the tag: a land terrain, not water, river or marsh.
    assert_eq!(cell.tag.kind(), TerrainKind::Land, "tag {:?}", cell.tag);
    assert_ne!(generator.terrains().name(cell.tag), "unknown");

    // Lower ground is never colder than the same column higher up.
    assert!(cell.temperature >= elevated.temperature);
    assert_eq!(
        cell.biome_type,
        WhittakerDiagram::default().lookup(cell.temperature, cell.moisture)
    );
}

#[test]
fn test_full_cold_dry_bias_gives_arid_biome() {
    let mut config = config(42);
    config.climate.temperature_bias = -1.0;
    config.climate.moisture_bias = -1.0;
    config.rivers.enabled = false;
    let generator = generator(config);

    let cell = sample(&generator, 0.0, 0.0);
    assert_eq!(cell.temperature, 0.0);
    assert_eq!(cell.moisture, 0.0);
    assert!(cell.biome_type.is_dry());
    assert_eq!(cell.river_mask, 1.0);
    assert_eq!(
        WhittakerDiagram::default().lookup(0.0, 0.0),
        BiomeType::Tundra
    );
}

#[test]
fn test_geology_fills_columns_to_the_surface() {
    let generator = generator(config(8));
    for (x, z) in points().take(10) {
        let cell = sample(&generator, x, z);
        let surface = generator.levels().to_height(cell.value);
        let mut blocks = Vec::new();
        generator.geology().strata_at(x, z).downwards(x, surface, z, |y, material| {
            blocks.push((y, material.clone()));
            true
        });
        assert_eq!(blocks.len() as i32, surface.max(-1) + 1);
        if let Some((top, _)) = blocks.first() {
            assert_eq!(*top, surface);
        }
    }
}

#[test]
fn test_rivers_only_ever_lower_the_surface() {
    let generator = generator(config(21));
    let mut cell = Cell::default();
    for (x, z) in points() {
        generator.heightmap(&mut cell, x, z);
        assert!(cell.value <= generator.base_height(x, z), "raised at {x},{z}");
        assert!(cell.river_mask <= 1.0);
    }
}
