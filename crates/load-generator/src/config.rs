//! Configuration types for a load generation run.

use crate::error::{LoadGenError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the dispatcher does when a round fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole run on the first failed round and cancel the other units.
    #[default]
    Strict,
    /// Count failed rounds, leave them out of the result and keep going.
    Lenient,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Strict => write!(f, "strict"),
            FailurePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// How a unit schedules its rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundMode {
    /// Rounds run one after another inside the unit task.
    #[default]
    Sequential,
    /// Every round is its own task, joined by the unit before it completes.
    Nested,
}

impl std::fmt::Display for RoundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundMode::Sequential => write!(f, "sequential"),
            RoundMode::Nested => write!(f, "nested"),
        }
    }
}

/// One load generation request.
///
/// Iteration and delay bounds are half-open: a unit draws from `[min, max)`
/// when `max > min` and uses exactly `min` when both are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Number of concurrent work units.
    pub unit_count: usize,
    /// Lower bound on rounds per unit.
    pub iter_min: u64,
    /// Upper bound on rounds per unit.
    pub iter_max: u64,
    /// Lower bound on the startup delay of each unit.
    pub delay_min: Duration,
    /// Upper bound on the startup delay of each unit.
    pub delay_max: Duration,
    /// Failure handling.
    pub policy: FailurePolicy,
    /// Round scheduling inside a unit.
    pub mode: RoundMode,
}

impl LoadRequest {
    /// Create a request for `unit_count` units with one round each and no delay.
    pub fn new(unit_count: usize) -> Self {
        Self {
            unit_count,
            iter_min: 1,
            iter_max: 1,
            delay_min: Duration::ZERO,
            delay_max: Duration::ZERO,
            policy: FailurePolicy::default(),
            mode: RoundMode::default(),
        }
    }

    /// Set the iteration bounds.
    pub fn with_iterations(mut self, min: u64, max: u64) -> Self {
        self.iter_min = min;
        self.iter_max = max;
        self
    }

    /// Set the startup delay bounds.
    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        self.delay_min = min;
        self.delay_max = max;
        self
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the round mode.
    pub fn with_mode(mut self, mode: RoundMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject inverted bounds.
    pub fn validate(&self) -> Result<()> {
        if self.iter_max < self.iter_min {
            return Err(LoadGenError::InvalidParameter(format!(
                "iteration max {} is below min {}",
                self.iter_max, self.iter_min
            )));
        }
        if self.delay_max < self.delay_min {
            return Err(LoadGenError::InvalidParameter(format!(
                "delay max {:?} is below min {:?}",
                self.delay_max, self.delay_min
            )));
        }
        Ok(())
    }

    /// Largest number of rounds this request can produce.
    pub fn max_rounds(&self) -> u64 {
        let per_unit = if self.iter_max > self.iter_min {
            self.iter_max - 1
        } else {
            self.iter_min
        };
        per_unit.saturating_mul(self.unit_count as u64)
    }
}
