//! The long-lived compute worker: one thread, one column partition per
//! tick.

use std::sync::Arc;

use petri_grid::{Grid, Partition, RuleTable};

use crate::barrier::{PoisonOnPanic, TickBarrier, Wait};
use crate::engine::CurrentGrid;

/// Everything a worker needs, moved onto its thread.
pub(crate) struct WorkerContext {
    pub index: u32,
    pub workers: u32,
    pub rule: RuleTable,
    pub barrier: Arc<TickBarrier>,
    pub current: Arc<CurrentGrid>,
}

/// The worker loop.
///
/// Per cycle: block at the barrier; after release, snapshot the
/// published destination grid *once*; recompute this worker's partition
/// against the destination's dimensions (they change when the canvas
/// resizes); advance every cell in `partition x full height` from the
/// previous destination; adopt the destination as the next cycle's
/// source. Exits on the distinguished stop signal or on poison.
///
/// `source` starts as the lineage's first published grid, captured
/// before the first barrier arrival.
pub(crate) fn run(ctx: WorkerContext, mut source: Arc<Grid>) {
    loop {
        match ctx.barrier.wait() {
            Wait::Released => {}
            Wait::Stopped | Wait::Poisoned(_) => return,
        }
        let dest = ctx.current.snapshot();
        {
            // If anything below panics, peers must not be left blocked
            // at the barrier forever.
            let _guard = PoisonOnPanic(&ctx.barrier);
            let part = Partition::for_worker(dest.width(), ctx.workers, ctx.index);
            for x in part.start..part.end {
                for y in 0..dest.height() {
                    dest.advance_cell(x, y, &source, &ctx.rule);
                }
            }
        }
        source = dest;
    }
}
