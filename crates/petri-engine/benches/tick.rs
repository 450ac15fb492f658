//! Criterion benchmarks for serial grid advancement and full engine runs.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petri_engine::{EngineConfig, FixedCanvas, LifeEngine};
use petri_grid::{factory, Grid, RuleTable};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;
const SEED: u64 = 0xBE_EF;
const GENERATIONS: u64 = 32;

fn seeded_grid() -> Grid {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    factory::random(WIDTH, HEIGHT, &mut rng).expect("valid bench dimensions")
}

/// One generation on one thread, no engine machinery at all.
fn bench_serial_tick(c: &mut Criterion) {
    let source = seeded_grid();
    let rule = RuleTable::conway();
    c.bench_function("serial_tick_256", |b| {
        b.iter(|| {
            let dest = Grid::new(WIDTH, HEIGHT).expect("valid bench dimensions");
            dest.advance_all(black_box(&source), &rule);
            black_box(dest.population())
        });
    });
}

/// A bounded engine run, spawn to join, across worker counts. Includes
/// thread startup cost, so compare worker counts against each other
/// rather than against the serial number.
fn bench_engine_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run_256x32");
    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let canvas = Arc::new(FixedCanvas::new(WIDTH, HEIGHT).expect("valid bench dimensions"));
                let config = EngineConfig {
                    worker_count: Some(workers),
                    max_generation: Some(GENERATIONS),
                    ..Default::default()
                };
                let (engine, frames) =
                    LifeEngine::spawn(config, canvas, seeded_grid()).expect("valid bench config");
                let mut last = 0;
                while let Some(frame) = frames.recv() {
                    last = frame.population();
                }
                engine.join().expect("bench run poisoned");
                black_box(last)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_serial_tick, bench_engine_run);
criterion_main!(benches);
