//! Headless run — the full parallel engine without any display.
//!
//! Demonstrates:
//!   1. Building an initial population (lattice with a centre block)
//!   2. Configuring and spawning the engine
//!   3. The consumer loop over [`Frames`]
//!   4. Reading the metrics snapshot after the run
//!
//! Run with:
//!   cargo run --example headless

use std::sync::Arc;

use petri_engine::{EngineConfig, FixedCanvas, LifeEngine};
use petri_grid::{factory, RuleTable};

// ─── Run parameters ─────────────────────────────────────────────

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;
const GENERATIONS: u64 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Petri headless run ===\n");

    // 1. Initial population: a stride-3 lattice with a solid 5x5 block
    // in the centre.
    let initial = factory::lattice_with_block(WIDTH, HEIGHT, 2)?;
    println!(
        "Initial: {}x{} lattice+block, population {}",
        WIDTH,
        HEIGHT,
        initial.population()
    );

    // 2. Spawn the engine. Worker count is auto-detected from the
    // available parallelism; the run ends after GENERATIONS ticks.
    let canvas = Arc::new(FixedCanvas::new(WIDTH, HEIGHT)?);
    let config = EngineConfig {
        rule: RuleTable::wide_survival(),
        max_generation: Some(GENERATIONS),
        ..Default::default()
    };
    println!(
        "Workers: {}, queue capacity: {}\n",
        config.resolved_worker_count(),
        config.queue_capacity
    );
    let (engine, frames) = LifeEngine::spawn(config, canvas, initial)?;

    // 3. Consume every generation; print a progress line every tenth.
    let mut last_population = 0;
    while let Some(frame) = frames.recv() {
        last_population = frame.population();
        if frame.tick() % 10 == 0 {
            println!(
                "  generation {:>3}: population {:>5}",
                frame.tick(),
                last_population
            );
        }
        // Dropping the frame here returns its buffer to the engine.
    }

    // 4. The run ended at the cap; inspect the counters.
    let metrics = engine.metrics();
    engine.join()?;
    println!(
        "\nDone: {} generations, {} buffers allocated, {} pool hits, final population {}",
        metrics.generations, metrics.buffers_allocated, metrics.pool_hits, last_population
    );

    Ok(())
}
