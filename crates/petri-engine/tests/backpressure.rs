//! A consumer that never drains must stall the producer after exactly
//! `queue_capacity` completed generations.

use std::sync::Arc;
use std::time::{Duration, Instant};

use petri_engine::{EngineConfig, FixedCanvas, LifeEngine};
use petri_grid::factory;

const CAPACITY: usize = 3;

/// Poll until `predicate` holds or the deadline passes.
fn eventually(deadline: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    predicate()
}

#[test]
fn producer_blocks_at_queue_capacity() {
    let canvas = Arc::new(FixedCanvas::new(16, 16).unwrap());
    let initial = factory::striped(16, 16, 2).unwrap();
    let config = EngineConfig {
        worker_count: Some(2),
        queue_capacity: CAPACITY,
        ..Default::default()
    };
    let (engine, frames) = LifeEngine::spawn(config, canvas, initial).unwrap();

    // With no consumer, the queue fills to capacity...
    assert!(
        eventually(Duration::from_secs(5), || frames.queued() == CAPACITY),
        "queue never filled to capacity"
    );
    // ...and the generation counter settles exactly there: the
    // coordinator is blocked mid-enqueue and produces nothing further.
    assert!(eventually(Duration::from_secs(5), || {
        engine.metrics().generations == CAPACITY as u64
    }));
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(engine.metrics().generations, CAPACITY as u64);
    assert_eq!(frames.queued(), CAPACITY);

    // Draining a single slot unblocks exactly one more enqueue.
    let frame = frames.recv().unwrap();
    assert_eq!(frame.tick(), 0);
    drop(frame);
    assert!(
        eventually(Duration::from_secs(5), || {
            engine.metrics().generations == CAPACITY as u64 + 1
        }),
        "producer did not resume after one slot drained"
    );

    // Backpressure is a blocking state, not a failure: the run still
    // ends cleanly.
    engine.stop();
    drop(frames);
    engine.join().unwrap();
}

#[test]
fn backpressure_does_not_trip_stall_detection() {
    // The coordinator may sit blocked on the full queue far longer than
    // the stall budget; that must not be reported as a stalled barrier.
    let canvas = Arc::new(FixedCanvas::new(8, 8).unwrap());
    let initial = factory::lattice(8, 8, 3).unwrap();
    let config = EngineConfig {
        worker_count: Some(2),
        queue_capacity: 1,
        stall_timeout: Some(Duration::from_millis(100)),
        ..Default::default()
    };
    let (engine, frames) = LifeEngine::spawn(config, canvas, initial).unwrap();

    // Let the engine sit blocked for several stall budgets.
    std::thread::sleep(Duration::from_millis(500));

    // Still alive: draining resumes production.
    let before = engine.metrics().generations;
    drop(frames.recv().unwrap());
    assert!(eventually(Duration::from_secs(5), || {
        engine.metrics().generations > before
    }));

    engine.stop();
    drop(frames);
    engine.join().unwrap();
}
