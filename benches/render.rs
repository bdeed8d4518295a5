//! Benchmarks for pattern network rendering.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use picbreed::{
    compute::evolution::{BreedRng, Population},
    display::{Mosaic, Selection},
    schema::{DisplayConfig, NetworkConfig, PopulationConfig},
};

fn bench_colour_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("colour_batch");
    let mut rng = BreedRng::new(42);
    let network = rng
        .random_network(&NetworkConfig::default())
        .expect("default topology is valid");

    for size in [16, 32, 64, 128] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, &size| {
                b.iter(|| black_box(network.colour_batch(size, size)));
            },
        );
    }

    group.finish();
}

fn bench_colour_per_pixel(c: &mut Criterion) {
    let mut rng = BreedRng::new(42);
    let network = rng
        .random_network(&NetworkConfig::default())
        .expect("default topology is valid");

    c.bench_function("colour_per_pixel_32x32", |b| {
        b.iter(|| {
            for i in 0..32 {
                for j in 0..32 {
                    black_box(network.colour(i, j).ok());
                }
            }
        });
    });
}

fn bench_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("population");

    for grid_size in [3, 4, 6] {
        let mut rng = BreedRng::new(7);
        let mut population = Population::new(PopulationConfig {
            grid_size,
            ..Default::default()
        })
        .expect("valid config");
        population.initialize(&mut rng).expect("initialize");

        group.bench_with_input(
            BenchmarkId::new("render_32", grid_size),
            &grid_size,
            |b, _| {
                b.iter(|| black_box(population.render(32, 32)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("evolve", grid_size),
            &grid_size,
            |b, _| {
                b.iter(|| {
                    let mut next = population.clone();
                    next.evolve(black_box(&[0, 1]), &mut rng).ok();
                    next
                });
            },
        );
    }

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let mut rng = BreedRng::new(42);
    let mut population = Population::new(PopulationConfig::default()).expect("default config");
    population.initialize(&mut rng).expect("initialize");
    let canvases = population.render(32, 32).expect("render");
    let mosaic = Mosaic::new(DisplayConfig::default(), 4).expect("default display");
    let mut selection = Selection::new();
    selection.toggle(5);

    c.bench_function("compose_500x500", |b| {
        b.iter(|| black_box(mosaic.compose(&canvases, &selection)));
    });
}

criterion_group!(
    benches,
    bench_colour_batch,
    bench_colour_per_pixel,
    bench_population,
    bench_compose
);
criterion_main!(benches);
