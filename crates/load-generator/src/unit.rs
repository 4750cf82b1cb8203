//! Work units: one delayed, concurrently scheduled batch of rounds.

use crate::compress::Compressor;
use crate::config::{FailurePolicy, RoundMode};
use crate::error::{LoadGenError, Result};
use crate::report::UnitReport;
use crate::round::run_round;
use crate::sampling::UnitPlan;
use crate::seed_pool::SeedPool;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Lifecycle of a work unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Created,
    Waiting,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl UnitState {
    /// Whether the unit can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            UnitState::Completed | UnitState::Failed | UnitState::Cancelled
        )
    }
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitState::Created => write!(f, "created"),
            UnitState::Waiting => write!(f, "waiting"),
            UnitState::Running => write!(f, "running"),
            UnitState::Completed => write!(f, "completed"),
            UnitState::Failed => write!(f, "failed"),
            UnitState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Handles shared by every unit of one run.
pub(crate) struct UnitContext<C> {
    pub pool: Arc<SeedPool>,
    pub compressor: Arc<C>,
    pub completed: Arc<AtomicU64>,
    pub cancel: CancellationToken,
    pub policy: FailurePolicy,
    pub mode: RoundMode,
}

impl<C> Clone for UnitContext<C> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            compressor: Arc::clone(&self.compressor),
            completed: Arc::clone(&self.completed),
            cancel: self.cancel.clone(),
            policy: self.policy,
            mode: self.mode,
        }
    }
}

/// A single unit of busy-work.
pub(crate) struct WorkUnit<C> {
    id: usize,
    plan: UnitPlan,
    rng: StdRng,
    ctx: UnitContext<C>,
    state: UnitState,
}

impl<C: Compressor> WorkUnit<C> {
    pub fn new(id: usize, plan: UnitPlan, rng: StdRng, ctx: UnitContext<C>) -> Self {
        Self {
            id,
            plan,
            rng,
            ctx,
            state: UnitState::Created,
        }
    }

    /// Wait out the startup delay, then run every planned round.
    ///
    /// Under the strict policy the first failed round ends the unit with that
    /// error. A cancelled unit returns what it finished so far.
    pub async fn run(mut self) -> Result<UnitReport> {
        let mut report = UnitReport::new(self.id, &self.plan);

        self.enter(UnitState::Waiting);
        let cancel = self.ctx.cancel.clone();
        let cancelled = tokio::select! {
            _ = tokio::time::sleep(self.plan.delay) => false,
            _ = cancel.cancelled() => true,
        };
        if cancelled {
            self.enter(UnitState::Cancelled);
            return Ok(report);
        }

        self.enter(UnitState::Running);
        let outcome = match self.ctx.mode {
            RoundMode::Sequential => self.run_sequential(&mut report).await,
            RoundMode::Nested => self.run_nested(&mut report).await,
        };

        match outcome {
            Ok(()) if report.completed + report.failed < report.iterations => {
                self.enter(UnitState::Cancelled);
                Ok(report)
            }
            Ok(()) => {
                self.enter(UnitState::Completed);
                Ok(report)
            }
            Err(e) => {
                self.enter(UnitState::Failed);
                Err(e)
            }
        }
    }

    async fn run_sequential(&mut self, report: &mut UnitReport) -> Result<()> {
        for round in 0..self.plan.iterations {
            if self.ctx.cancel.is_cancelled() {
                break;
            }
            trace!(unit = self.id, round, "starting round");

            match run_round(
                &self.ctx.pool,
                &*self.ctx.compressor,
                &self.ctx.completed,
                self.id,
                round,
                &mut self.rng,
            ) {
                Ok(()) => report.completed += 1,
                Err(e) => self.absorb(e, report)?,
            }

            // Give waiting units and cancellation a chance to run between rounds.
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    async fn run_nested(&mut self, report: &mut UnitReport) -> Result<()> {
        let rounds_cancel = self.ctx.cancel.child_token();
        let mut rounds = JoinSet::new();

        for round in 0..self.plan.iterations {
            let ctx = self.ctx.clone();
            let cancel = rounds_cancel.clone();
            let mut rng = StdRng::seed_from_u64(self.rng.random());
            let unit_id = self.id;

            rounds.spawn(async move {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(run_round(
                    &ctx.pool,
                    &*ctx.compressor,
                    &ctx.completed,
                    unit_id,
                    round,
                    &mut rng,
                ))
            });
        }

        let mut first_error = None;
        while let Some(joined) = rounds.join_next().await {
            match joined? {
                None => {}
                Some(Ok(())) => report.completed += 1,
                Some(Err(e)) => {
                    if let Err(e) = self.absorb(e, report) {
                        rounds_cancel.cancel();
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Apply the failure policy to a failed round. Returns the error when the
    /// unit has to stop.
    fn absorb(&self, error: LoadGenError, report: &mut UnitReport) -> Result<()> {
        match self.ctx.policy {
            FailurePolicy::Strict => Err(error),
            FailurePolicy::Lenient => {
                warn!(unit = self.id, "Round failed, continuing: {}", error);
                report.failed += 1;
                Ok(())
            }
        }
    }

    fn enter(&mut self, next: UnitState) {
        debug_assert!(!self.state.is_terminal(), "unit {} already {}", self.id, self.state);
        debug!(unit = self.id, from = %self.state, to = %next, "unit state change");
        self.state = next;
    }
}
