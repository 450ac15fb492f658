//! The per-tick rendezvous point for the worker pool.
//!
//! [`TickBarrier`] is a counter + condvar barrier with one load-bearing
//! extension over a plain reusable barrier: the **last arriver runs the
//! coordinator action while still holding the lock**, before any peer is
//! released. The action performs the generation swap, so no worker can
//! begin writing into a buffer until the swap has finished — that
//! ordering is the engine's core correctness guarantee, and it must hold
//! even when the action blocks on the handoff queue (backpressure).
//!
//! Peers park on the condvar during the action, so holding the lock for
//! the action's full duration costs nothing. It also gives stall
//! detection a useful shape for free: a waiter whose `wait_timeout`
//! expires must reacquire the lock before it can inspect anything, so a
//! coordinator legitimately blocked on backpressure keeps would-be
//! stall-reporters parked on the lock instead of letting them declare a
//! false positive.
//!
//! The barrier is owned solely by the workers (each holds an `Arc`).
//! When the run ends and the workers exit, the barrier — and with it the
//! coordinator action and its handoff sender — is dropped, which is what
//! disconnects the consumer's frame channel. How the run ended outlives
//! the barrier in a shared [`RunOutcome`].

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// What the coordinator action tells the barrier to do next.
pub(crate) enum TickFlow {
    /// Release the workers into the next tick.
    Continue,
    /// End the run: generation cap reached, stop requested, or the
    /// consumer disconnected.
    Stop,
}

/// Why the barrier was poisoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PoisonKind {
    /// A worker panicked mid-tick; the tick can never complete.
    WorkerPanic,
    /// No barrier progress within the stall budget.
    Stall,
}

/// Outcome of a [`TickBarrier::wait`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wait {
    /// All workers arrived, the coordinator action ran, compute the
    /// next generation.
    Released,
    /// The run ended deliberately; exit the worker loop cleanly.
    Stopped,
    /// The run ended fatally; exit the worker loop.
    Poisoned(PoisonKind),
}

/// How a finished run ended. Written once by the barrier, read by the
/// engine handle after the workers are joined.
#[derive(Debug, Default)]
pub(crate) struct RunOutcome(AtomicU8);

const OUTCOME_RUNNING: u8 = 0;
const OUTCOME_STOPPED: u8 = 1;
const OUTCOME_WORKER_PANIC: u8 = 2;
const OUTCOME_STALL: u8 = 3;

impl RunOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// First verdict wins; later transitions are ignored.
    fn record(&self, value: u8) {
        let _ = self.0.compare_exchange(
            OUTCOME_RUNNING,
            value,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// The fatal outcome, if any. `None` means still running or a clean
    /// stop.
    pub fn poison_kind(&self) -> Option<PoisonKind> {
        match self.0.load(Ordering::Acquire) {
            OUTCOME_WORKER_PANIC => Some(PoisonKind::WorkerPanic),
            OUTCOME_STALL => Some(PoisonKind::Stall),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Running,
    Stopping,
    Poisoned(PoisonKind),
}

type Action = Box<dyn FnMut() -> TickFlow + Send>;

struct Inner {
    arrived: u32,
    /// Completed barrier cycles. Waiters capture this on arrival and
    /// treat any change as their release signal.
    cycle: u64,
    status: Status,
    action: Action,
}

impl Inner {
    fn end_run(&mut self, status: Status, outcome: &RunOutcome) {
        if self.status != Status::Running {
            return;
        }
        self.status = status;
        outcome.record(match status {
            Status::Running => unreachable!("end_run never re-enters Running"),
            Status::Stopping => OUTCOME_STOPPED,
            Status::Poisoned(PoisonKind::WorkerPanic) => OUTCOME_WORKER_PANIC,
            Status::Poisoned(PoisonKind::Stall) => OUTCOME_STALL,
        });
    }
}

/// Reusable rendezvous barrier for `parties` workers with a coordinator
/// action run exactly once per cycle by the last arriver.
pub(crate) struct TickBarrier {
    parties: u32,
    stall_timeout: Option<Duration>,
    /// Out-of-band stop request. Lives outside the mutex so it can be
    /// set while the action holds the lock (e.g. blocked on a full
    /// handoff queue); the action polls it.
    stop_requested: Arc<AtomicBool>,
    outcome: Arc<RunOutcome>,
    inner: Mutex<Inner>,
    condvar: Condvar,
}

impl TickBarrier {
    /// Create a barrier for `parties` workers.
    ///
    /// `action` runs once per cycle on the last-arriving worker's
    /// thread. `stall_timeout` bounds how long a waiter tolerates zero
    /// barrier progress before poisoning; `None` disables detection.
    pub fn new(
        parties: u32,
        stall_timeout: Option<Duration>,
        stop_requested: Arc<AtomicBool>,
        outcome: Arc<RunOutcome>,
        action: Action,
    ) -> Self {
        assert!(parties > 0, "barrier needs at least one party");
        Self {
            parties,
            stall_timeout,
            stop_requested,
            outcome,
            inner: Mutex::new(Inner {
                arrived: 0,
                cycle: 0,
                status: Status::Running,
                action,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Block until all parties arrive and the coordinator action has
    /// run, or until the run ends.
    pub fn wait(&self) -> Wait {
        let mut inner = self.inner.lock().unwrap();
        if self.stop_requested.load(Ordering::Acquire) {
            inner.end_run(Status::Stopping, &self.outcome);
            self.condvar.notify_all();
        }
        match inner.status {
            Status::Stopping => return Wait::Stopped,
            Status::Poisoned(kind) => return Wait::Poisoned(kind),
            Status::Running => {}
        }

        inner.arrived += 1;
        if inner.arrived == self.parties {
            // Last arriver: run the swap action before anyone is
            // released. Peers are parked on the condvar, not the lock,
            // so holding the lock across a blocking action is fine.
            let flow = (inner.action)();
            inner.arrived = 0;
            inner.cycle = inner.cycle.wrapping_add(1);
            if matches!(flow, TickFlow::Stop) {
                inner.end_run(Status::Stopping, &self.outcome);
            }
            self.condvar.notify_all();
            match inner.status {
                Status::Stopping => Wait::Stopped,
                Status::Poisoned(kind) => Wait::Poisoned(kind),
                Status::Running => Wait::Released,
            }
        } else {
            let arrival_cycle = inner.cycle;
            let deadline = self.stall_timeout.map(|t| Instant::now() + t);
            loop {
                match inner.status {
                    Status::Stopping => return Wait::Stopped,
                    Status::Poisoned(kind) => return Wait::Poisoned(kind),
                    Status::Running => {}
                }
                if inner.cycle != arrival_cycle {
                    return Wait::Released;
                }
                inner = match deadline {
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            // No progress within the stall budget: a
                            // peer died or wedged without reaching the
                            // barrier. Wake everyone rather than hang
                            // silently.
                            inner.end_run(
                                Status::Poisoned(PoisonKind::Stall),
                                &self.outcome,
                            );
                            self.condvar.notify_all();
                            return Wait::Poisoned(PoisonKind::Stall);
                        }
                        let (guard, _) =
                            self.condvar.wait_timeout(inner, deadline - now).unwrap();
                        guard
                    }
                    None => self.condvar.wait(inner).unwrap(),
                };
            }
        }
    }

    /// Poison the barrier, waking every waiter with a fatal outcome.
    ///
    /// Called from a panicking worker's drop guard: the tick can never
    /// complete, so peers must not be left blocked forever.
    pub fn poison(&self, kind: PoisonKind) {
        // Recover the guard even if the mutex itself was poisoned by a
        // panic elsewhere; this path must always manage to wake peers.
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.end_run(Status::Poisoned(kind), &self.outcome);
        self.condvar.notify_all();
    }
}

/// Poisons the barrier if dropped during a panic.
///
/// Armed by each worker around its compute phase. A worker that dies
/// mid-write can never arrive at the barrier, which would otherwise
/// leave every peer blocked there for good.
pub(crate) struct PoisonOnPanic<'a>(pub &'a TickBarrier);

impl Drop for PoisonOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.poison(PoisonKind::WorkerPanic);
        }
    }
}
