use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tellus_config::Config;
use tellus_worldgen::{Cell, GeneratorContext, WorldGenerator};

fn generator() -> WorldGenerator {
    let mut config = Config::default();
    config.world.seed = 42;
    config.threads.worker_threads = 1;
    config.threads.tile_size = 32;
    let ctx = GeneratorContext::new(config).unwrap();
    WorldGenerator::new(&ctx).unwrap()
}

fn bench_point_sample(c: &mut Criterion) {
    let generator = generator();
    let mut cell = Cell::default();
    let mut i = 0.0;
    c.bench_function("point_sample", |bencher| {
        bencher.iter(|| {
            i += 17.0;
            generator.apply(&mut cell, black_box(i), black_box(-i * 0.5));
            black_box(cell.value)
        })
    });
}

fn bench_surface_sample(c: &mut Criterion) {
    let generator = generator();
    let mut cell = Cell::default();
    c.bench_function("surface_sample", |bencher| {
        bencher.iter(|| {
            generator.heightmap(&mut cell, black_box(1234.0), black_box(-567.0));
            black_box(cell.value)
        })
    });
}

fn bench_tile(c: &mut Criterion) {
    let generator = generator();
    c.bench_function("tile_32", |bencher| {
        bencher.iter(|| black_box(generator.generate_tile(black_box(3), black_box(-2))))
    });
}

criterion_group!(benches, bench_point_sample, bench_surface_sample, bench_tile);
criterion_main!(benches);
