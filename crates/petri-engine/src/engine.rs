//! The engine facade: thread spawning, the coordinator action, and the
//! run lifecycle.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, SendTimeoutError, Sender};
use petri_grid::Grid;

use crate::barrier::{PoisonKind, RunOutcome, TickBarrier, TickFlow};
use crate::canvas::CanvasSource;
use crate::config::{ConfigError, EngineConfig};
use crate::error::EngineError;
use crate::handoff::Frames;
use crate::metrics::{Counters, EngineMetrics};
use crate::pool::GridPool;
use crate::worker::{self, WorkerContext};

/// How often a coordinator blocked on the full handoff queue re-checks
/// the stop flag.
const ENQUEUE_POLL: Duration = Duration::from_millis(10);

/// The atomically swappable "current grid" reference.
///
/// The one datum mutated by the coordinator and read by every worker.
/// Holds the grid workers write into during the running tick; the
/// coordinator's barrier action swaps in the next destination and takes
/// back the completed one. Workers snapshot it exactly once per tick,
/// never mid-computation.
#[derive(Debug)]
pub(crate) struct CurrentGrid(Mutex<Arc<Grid>>);

impl CurrentGrid {
    fn new(grid: Arc<Grid>) -> Self {
        Self(Mutex::new(grid))
    }

    /// Clone the published reference.
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.0.lock().unwrap())
    }

    /// Publish `next`, returning the previous (now completed) grid.
    fn swap(&self, next: Arc<Grid>) -> Arc<Grid> {
        mem::replace(&mut *self.0.lock().unwrap(), next)
    }
}

/// A running parallel tick engine.
///
/// Spawned by [`spawn`](Self::spawn), which also returns the consumer's
/// [`Frames`] handle. The engine runs as fast as its workers and the
/// consumer allow; it ends at the configured generation cap, on
/// [`stop`](Self::stop), when the consumer drops its `Frames`, or
/// fatally (worker panic, barrier stall).
#[derive(Debug)]
pub struct LifeEngine {
    stop_flag: Arc<AtomicBool>,
    outcome: Arc<RunOutcome>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl LifeEngine {
    /// Validate `config`, publish `initial` as generation 0, and spawn
    /// the worker pool.
    ///
    /// `initial` is handed to the consumer as the first frame before any
    /// computed generation. Its dimensions need not match the canvas;
    /// the first tick's destination is already sized from the canvas, so
    /// a mismatch just means one extra allocation.
    pub fn spawn(
        config: EngineConfig,
        canvas: Arc<dyn CanvasSource>,
        initial: Grid,
    ) -> Result<(Self, Frames), ConfigError> {
        config.validate()?;
        let worker_count = config.resolved_worker_count() as u32;

        let pool = Arc::new(GridPool::new());
        let counters = Arc::new(Counters::default());
        let stop_flag = Arc::new(AtomicBool::new(false));
        let outcome = Arc::new(RunOutcome::new());
        let (tx, rx) = bounded::<Arc<Grid>>(config.queue_capacity);
        let frames = Frames::new(rx, Arc::clone(&pool));

        let initial = Arc::new(initial);
        let current = Arc::new(CurrentGrid::new(Arc::clone(&initial)));

        let action = coordinator_action(
            Arc::clone(&current),
            canvas,
            Arc::clone(&pool),
            tx,
            Arc::clone(&counters),
            Arc::clone(&stop_flag),
            config.max_generation,
        );
        // The barrier (and with it the action and the handoff sender) is
        // owned only by the workers: when the last worker exits, the
        // sender drops and the consumer's channel disconnects.
        let barrier = Arc::new(TickBarrier::new(
            worker_count,
            config.stall_timeout,
            Arc::clone(&stop_flag),
            Arc::clone(&outcome),
            action,
        ));

        let workers = (0..worker_count)
            .map(|index| {
                let ctx = WorkerContext {
                    index,
                    workers: worker_count,
                    rule: config.rule,
                    barrier: Arc::clone(&barrier),
                    current: Arc::clone(&current),
                };
                let source = Arc::clone(&initial);
                std::thread::Builder::new()
                    .name(format!("petri-worker-{index}"))
                    .spawn(move || worker::run(ctx, source))
                    .expect("failed to spawn petri worker")
            })
            .collect();

        drop(barrier);

        Ok((
            Self {
                stop_flag,
                outcome,
                workers,
                counters,
            },
            frames,
        ))
    }

    /// Request the distinguished stop signal. The run ends at the next
    /// tick boundary; already-queued frames remain receivable.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    /// A point-in-time snapshot of the engine counters.
    pub fn metrics(&self) -> EngineMetrics {
        self.counters.snapshot()
    }

    /// Wait for the run to end and report how it ended.
    ///
    /// `Ok(())` for every deliberate ending (generation cap, `stop`,
    /// consumer disconnect); an [`EngineError`] if the run was poisoned.
    pub fn join(mut self) -> Result<(), EngineError> {
        self.join_workers()
    }

    fn join_workers(&mut self) -> Result<(), EngineError> {
        let mut panicked = false;
        for handle in self.workers.drain(..) {
            panicked |= handle.join().is_err();
        }
        match self.outcome.poison_kind() {
            Some(PoisonKind::Stall) => Err(EngineError::Stalled),
            Some(PoisonKind::WorkerPanic) => Err(EngineError::WorkerPanic),
            None if panicked => Err(EngineError::WorkerPanic),
            None => Ok(()),
        }
    }
}

impl Drop for LifeEngine {
    fn drop(&mut self) {
        self.stop();
        let _ = self.join_workers();
    }
}

/// Build the barrier action: the tick coordinator.
///
/// Runs exactly once per tick, on the last-arriving worker, before any
/// worker is released into the next cycle. Steps, in order: obtain the
/// next destination (pool hit or fresh allocation at the canvas's
/// current dimensions), publish it as the new current grid, stamp its
/// generation number, enqueue the completed grid (blocking while the
/// queue is full), and check the generation cap.
#[allow(clippy::too_many_arguments)]
fn coordinator_action(
    current: Arc<CurrentGrid>,
    canvas: Arc<dyn CanvasSource>,
    pool: Arc<GridPool>,
    tx: Sender<Arc<Grid>>,
    counters: Arc<Counters>,
    stop_flag: Arc<AtomicBool>,
    max_generation: Option<u64>,
) -> Box<dyn FnMut() -> TickFlow + Send> {
    Box::new(move || {
        if stop_flag.load(Ordering::Acquire) {
            return TickFlow::Stop;
        }

        // 1. Size the next destination from the canvas *now* — this is
        // how window resizes propagate. A transiently invalid report
        // keeps the completed grid's shape instead.
        let completed_probe = current.snapshot();
        let mut width = canvas.width();
        let mut height = canvas.height();
        if width == 0 || height == 0 || width > Grid::MAX_DIM || height > Grid::MAX_DIM {
            width = completed_probe.width();
            height = completed_probe.height();
        }
        drop(completed_probe);

        let next = match pool.acquire(width, height) {
            Some(grid) => {
                counters.pool_hits.fetch_add(1, Ordering::Relaxed);
                grid
            }
            None => {
                counters.buffers_allocated.fetch_add(1, Ordering::Relaxed);
                // Dimensions were sanitised above; construction cannot fail.
                Arc::new(Grid::new(width, height).expect("sanitised canvas dimensions"))
            }
        };

        // 2. Publish the new destination, retrieving the grid the
        // workers just finished. No worker reads the reference until
        // the barrier releases them.
        let completed = current.swap(Arc::clone(&next));
        let completed_tick = completed.tick();
        next.set_tick(completed_tick + 1);

        // 3. Hand the completed generation to the consumer. A full
        // queue blocks the whole simulation (deliberate backpressure),
        // polling only for stop requests and consumer disconnect.
        let mut pending = completed;
        loop {
            match tx.send_timeout(pending, ENQUEUE_POLL) {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(grid)) => {
                    if stop_flag.load(Ordering::Acquire) {
                        return TickFlow::Stop;
                    }
                    pending = grid;
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    // Consumer gone; nothing left to compute for.
                    return TickFlow::Stop;
                }
            }
        }
        counters.generations.fetch_add(1, Ordering::Relaxed);

        // 4. Generation cap: a deliberate stop, distinct from failure.
        // The capped generation was already enqueued.
        if max_generation.is_some_and(|max| completed_tick >= max) {
            return TickFlow::Stop;
        }

        TickFlow::Continue
    })
}
