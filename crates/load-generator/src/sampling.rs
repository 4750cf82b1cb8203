//! Per-unit parameter derivation.

use crate::config::LoadRequest;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resolved parameters for one work unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlan {
    /// Startup delay before the first round.
    pub delay: Duration,
    /// Number of rounds to run.
    pub iterations: u64,
}

impl UnitPlan {
    /// Create a plan with fixed parameters.
    pub fn new(delay: Duration, iterations: u64) -> Self {
        Self { delay, iterations }
    }

    /// Draw a plan from the request bounds.
    pub fn sample<R: Rng>(request: &LoadRequest, rng: &mut R) -> Self {
        Self {
            delay: sample_delay(rng, request.delay_min, request.delay_max),
            iterations: sample_iterations(rng, request.iter_min, request.iter_max),
        }
    }
}

/// Uniform draw from `[min, max)`, or `min` when the range is empty.
pub fn sample_iterations<R: Rng>(rng: &mut R, min: u64, max: u64) -> u64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Uniform draw from `[min, max)`, or `min` when the range is empty.
pub fn sample_delay<R: Rng>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
