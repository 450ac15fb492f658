//! Engine configuration and its validation errors.

use std::fmt;
use std::time::Duration;

use petri_grid::RuleTable;

/// Configuration for [`LifeEngine`](crate::engine::LifeEngine).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of compute workers. `None` = auto-detect from
    /// `available_parallelism`, clamped to `[1, 64]`.
    pub worker_count: Option<usize>,
    /// Capacity of the bounded consumer-handoff queue. When the queue is
    /// full the whole simulation stalls until the consumer drains a slot
    /// — this is the one place rendering speed throttles compute speed.
    /// Default: 5.
    pub queue_capacity: usize,
    /// Transition rule applied by every worker. Default: canonical
    /// Conway (`survive {2,3}`, `birth {3}`).
    pub rule: RuleTable,
    /// Stop the run once the completed generation reaches this count.
    /// `None` = run until stopped. Used for bounded/benchmark runs.
    pub max_generation: Option<u64>,
    /// How long a worker tolerates zero barrier progress before the run
    /// is declared stalled and aborted. Bounds a single worker's compute
    /// time for one tick; backpressure blocking does not count against
    /// it. `None` disables detection. Default: 30 seconds.
    pub stall_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            queue_capacity: 5,
            rule: RuleTable::conway(),
            max_generation: None,
            stall_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl EngineConfig {
    /// Resolve the actual worker count, applying auto-detection if
    /// `None`. Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                cpus.clamp(1, 64)
            }
        }
    }

    /// Check structural invariants before any thread is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::QueueCapacityZero);
        }
        if self.stall_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroStallTimeout);
        }
        Ok(())
    }
}

/// Errors detected during [`EngineConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_count` was explicitly zero; no one would ever compute a
    /// tick or trip the barrier.
    ZeroWorkers,
    /// `queue_capacity` was zero; the coordinator could never hand off a
    /// completed generation.
    QueueCapacityZero,
    /// `stall_timeout` was zero; every tick would be declared stalled.
    ZeroStallTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
            Self::QueueCapacityZero => write!(f, "queue_capacity must be at least 1"),
            Self::ZeroStallTimeout => write!(f, "stall_timeout must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_workers_rejected() {
        let config = EngineConfig {
            worker_count: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn zero_queue_capacity_rejected() {
        let config = EngineConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::QueueCapacityZero));
    }

    #[test]
    fn zero_stall_timeout_rejected() {
        let config = EngineConfig {
            stall_timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroStallTimeout));
    }

    #[test]
    fn explicit_worker_count_clamped() {
        let config = EngineConfig {
            worker_count: Some(1_000),
            ..Default::default()
        };
        assert_eq!(config.resolved_worker_count(), 64);
        let config = EngineConfig {
            worker_count: Some(3),
            ..Default::default()
        };
        assert_eq!(config.resolved_worker_count(), 3);
    }
}
