//! Benchmarks for the generation engine and circle geometry.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use lattice_life::{
    compute::{CellLocation, CircleCache, GridSize, RadialGrowthEngine, perimeter_offsets, step_generation},
    schema::{LatixConfig, Pattern, RuleVariants, Seed},
};

fn bench_step_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_generation");

    for size in [64, 128, 256, 512, 1024] {
        let grid = GridSize::new(size, size).unwrap();
        let seed = Seed {
            pattern: Pattern::Random {
                density: 0.1,
                seed: 7,
            },
            selections: Vec::new(),
        };
        let active = seed.generate(grid, RuleVariants::CONWAY).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| step_generation(black_box(&active), grid, RuleVariants::CONWAY));
            },
        );
    }

    group.finish();
}

fn bench_perimeter(c: &mut Criterion) {
    let mut group = c.benchmark_group("perimeter");

    for radius in [8u32, 64, 256] {
        group.bench_with_input(BenchmarkId::new("uncached", radius), &radius, |b, &r| {
            b.iter(|| perimeter_offsets(black_box(r), 1));
        });

        let cache = CircleCache::new(1);
        cache.perimeter(radius);
        group.bench_with_input(BenchmarkId::new("cached", radius), &radius, |b, &r| {
            b.iter(|| cache.perimeter(black_box(r)));
        });
    }

    group.finish();
}

fn bench_latix_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("latix_tick");

    for selections in [1, 8, 32] {
        let grid = GridSize::new(256, 256).unwrap();
        let config = LatixConfig {
            rng_seed: Some(1),
            ..LatixConfig::default()
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_selections", selections)),
            &selections,
            |b, &n| {
                b.iter(|| {
                    let mut engine = RadialGrowthEngine::new(grid, &config);
                    for i in 0..n {
                        engine.start_selection(CellLocation::new(i * 7 % 256, i * 13 % 256), None);
                    }
                    for _ in 0..32 {
                        black_box(engine.tick());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_step_generation, bench_perimeter, bench_latix_tick);
criterion_main!(benches);
