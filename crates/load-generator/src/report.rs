//! Result types for a load generation run.

use crate::config::{FailurePolicy, RoundMode};
use crate::sampling::UnitPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one work unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Position of the unit in dispatch order.
    pub unit_id: usize,
    /// Startup delay in milliseconds, for display.
    pub delay_ms: u64,
    /// Exact startup delay in nanoseconds.
    pub delay_ns: u64,
    /// Rounds the unit was planned to run.
    pub iterations: u64,
    /// Rounds that verified.
    pub completed: u64,
    /// Rounds that failed (lenient policy only).
    pub failed: u64,
}

impl UnitReport {
    /// Empty report for a unit about to run `plan`.
    pub fn new(unit_id: usize, plan: &UnitPlan) -> Self {
        Self {
            unit_id,
            delay_ms: plan.delay.as_millis() as u64,
            delay_ns: plan.delay.as_nanos() as u64,
            iterations: plan.iterations,
            completed: 0,
            failed: 0,
        }
    }

    /// The plan this unit ran, for replaying a run.
    pub fn plan(&self) -> UnitPlan {
        UnitPlan::new(Duration::from_nanos(self.delay_ns), self.iterations)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When dispatch started.
    pub started_at: DateTime<Utc>,
    /// When the last unit was joined.
    pub completed_at: DateTime<Utc>,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
    /// Failure policy in effect.
    pub policy: FailurePolicy,
    /// Round mode in effect.
    pub mode: RoundMode,
    /// Verified rounds across all units.
    pub completed_rounds: u64,
    /// Failed rounds across all units.
    pub failed_rounds: u64,
    /// Per-unit results, ordered by unit id.
    pub units: Vec<UnitReport>,
}

impl RunReport {
    /// Rounds all units were planned to run.
    pub fn planned_rounds(&self) -> u64 {
        self.units.iter().map(|u| u.iterations).sum()
    }

    /// Longest startup delay of any unit.
    pub fn max_delay(&self) -> Duration {
        Duration::from_nanos(self.units.iter().map(|u| u.delay_ns).max().unwrap_or(0))
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Verified rounds per second.
    pub fn rounds_per_second(&self) -> f64 {
        if self.elapsed_ms > 0 {
            self.completed_rounds as f64 / (self.elapsed_ms as f64 / 1000.0)
        } else {
            0.0
        }
    }

    /// Plans of every unit, in unit order.
    pub fn plans(&self) -> Vec<UnitPlan> {
        self.units.iter().map(UnitReport::plan).collect()
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Load Generator Report\n\
             =====================\n\
             Policy: {}\n\
             Mode: {}\n\
             Units: {}\n\n\
             Results:\n\
             - Planned Rounds: {}\n\
             - Completed: {}\n\
             - Failed: {}\n\n\
             Timing:\n\
             - Elapsed: {:?}\n\
             - Max Unit Delay: {:?}\n\
             - Throughput: {:.2} rounds/sec\n",
            self.policy,
            self.mode,
            self.units.len(),
            self.planned_rounds(),
            self.completed_rounds,
            self.failed_rounds,
            self.elapsed(),
            self.max_delay(),
            self.rounds_per_second(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(unit_id: usize, delay_ms: u64, iterations: u64, completed: u64) -> UnitReport {
        UnitReport {
            unit_id,
            delay_ms,
            delay_ns: delay_ms * 1_000_000,
            iterations,
            completed,
            failed: iterations - completed,
        }
    }

    fn report() -> RunReport {
        let now = Utc::now();
        RunReport {
            started_at: now,
            completed_at: now,
            elapsed_ms: 2000,
            policy: FailurePolicy::Lenient,
            mode: RoundMode::Sequential,
            completed_rounds: 25,
            failed_rounds: 5,
            units: vec![unit(0, 120, 10, 10), unit(1, 250, 20, 15)],
        }
    }

    #[test]
    fn test_totals() {
        let report = report();
        assert_eq!(report.planned_rounds(), 30);
        assert_eq!(report.max_delay(), Duration::from_millis(250));
        assert_eq!(report.rounds_per_second(), 12.5);
    }

    #[test]
    fn test_zero_elapsed() {
        let mut report = report();
        report.elapsed_ms = 0;
        assert_eq!(report.rounds_per_second(), 0.0);
    }

    #[test]
    fn test_plans_replay_unit_parameters() {
        let plans = report().plans();
        assert_eq!(plans[1], UnitPlan::new(Duration::from_millis(250), 20));
    }

    #[test]
    fn test_plan_keeps_sub_millisecond_delay() {
        let plan = UnitPlan::new(Duration::from_micros(150_700), 3);
        let unit = UnitReport::new(0, &plan);

        assert_eq!(unit.delay_ms, 150);
        assert_eq!(unit.plan(), plan);
    }

    #[test]
    fn test_summary() {
        let summary = report().summary();
        assert!(summary.contains("lenient"));
        assert!(summary.contains("Completed: 25"));
        assert!(summary.contains("Failed: 5"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["policy"], "lenient");
        assert_eq!(json["units"][1]["delay_ms"], 250);
    }
}
