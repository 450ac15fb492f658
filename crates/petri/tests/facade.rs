//! The whole stack driven through the facade's prelude only.

use std::sync::Arc;

use petri::prelude::*;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

#[test]
fn prelude_covers_a_complete_bounded_run() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let initial = petri::grid::factory::random(40, 30, &mut rng).unwrap();
    let canvas = Arc::new(FixedCanvas::new(40, 30).unwrap());
    let config = EngineConfig {
        worker_count: Some(4),
        rule: RuleTable::wide_survival(),
        max_generation: Some(20),
        ..Default::default()
    };
    let (engine, frames) = LifeEngine::spawn(config, canvas, initial).unwrap();

    let mut count = 0u64;
    while let Some(frame) = frames.recv() {
        assert_eq!(frame.tick(), count);
        assert_eq!((frame.width(), frame.height()), (40, 30));
        count += 1;
    }
    assert_eq!(count, 21);

    let metrics = engine.metrics();
    engine.join().unwrap();
    assert_eq!(metrics.generations, 21);
}
