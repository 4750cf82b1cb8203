//! Fan-out of work units and aggregation of their results.

use crate::compress::{Compressor, GzipCompressor};
use crate::config::{FailurePolicy, LoadRequest, RoundMode};
use crate::error::{LoadGenError, Result};
use crate::report::RunReport;
use crate::sampling::UnitPlan;
use crate::seed_pool::SeedPool;
use crate::unit::{UnitContext, WorkUnit};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Mixed into the base seed so plan sampling does not replay the seed pool stream.
const DISPATCH_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Launches work units and joins them.
///
/// The seed pool is built once per generator and shared by every run.
pub struct LoadGenerator<C = GzipCompressor> {
    pool: Arc<SeedPool>,
    compressor: Arc<C>,
    seed: Option<u64>,
}

impl LoadGenerator<GzipCompressor> {
    /// Create a generator with a fresh random seed pool and gzip compression.
    pub fn new() -> Self {
        Self {
            pool: Arc::new(SeedPool::generate(&mut rand::rng())),
            compressor: Arc::new(GzipCompressor::default()),
            seed: None,
        }
    }

    /// Create a generator whose seed pool, unit plans and payloads are all
    /// derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pool: Arc::new(SeedPool::generate(&mut StdRng::seed_from_u64(seed))),
            compressor: Arc::new(GzipCompressor::default()),
            seed: Some(seed),
        }
    }
}

impl Default for LoadGenerator<GzipCompressor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compressor> LoadGenerator<C> {
    /// Swap the compressor used by rounds.
    pub fn with_compressor<D: Compressor>(self, compressor: D) -> LoadGenerator<D> {
        LoadGenerator {
            pool: self.pool,
            compressor: Arc::new(compressor),
            seed: self.seed,
        }
    }

    /// Replace the seed pool.
    pub fn with_seed_pool(mut self, pool: SeedPool) -> Self {
        self.pool = Arc::new(pool);
        self
    }

    /// The seed pool shared by all units.
    pub fn seed_pool(&self) -> &SeedPool {
        &self.pool
    }

    /// Run `unit_count` units with the default policy and mode and return the
    /// number of verified rounds.
    pub async fn run(
        &self,
        unit_count: usize,
        iter_min: u64,
        iter_max: u64,
        delay_min: Duration,
        delay_max: Duration,
    ) -> Result<u64> {
        let request = LoadRequest::new(unit_count)
            .with_iterations(iter_min, iter_max)
            .with_delay(delay_min, delay_max);
        let report = self.execute(&request).await?;
        Ok(report.completed_rounds)
    }

    /// Validate `request`, sample one plan per unit and run them all.
    pub async fn execute(&self, request: &LoadRequest) -> Result<RunReport> {
        request.validate()?;

        let mut rng = self.dispatch_rng();
        let plans: Vec<UnitPlan> = (0..request.unit_count)
            .map(|_| UnitPlan::sample(request, &mut rng))
            .collect();

        self.dispatch(plans, request.policy, request.mode, &mut rng)
            .await
    }

    /// Run an explicit set of unit plans, one unit per plan.
    pub async fn execute_plans(
        &self,
        plans: Vec<UnitPlan>,
        policy: FailurePolicy,
        mode: RoundMode,
    ) -> Result<RunReport> {
        let mut rng = self.dispatch_rng();
        self.dispatch(plans, policy, mode, &mut rng).await
    }

    fn dispatch_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ DISPATCH_SEED_MIX),
            None => StdRng::from_os_rng(),
        }
    }

    async fn dispatch(
        &self,
        plans: Vec<UnitPlan>,
        policy: FailurePolicy,
        mode: RoundMode,
        rng: &mut StdRng,
    ) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        let unit_count = plans.len();
        let planned: u64 = plans.iter().map(|p| p.iterations).sum();

        let completed = Arc::new(AtomicU64::new(0));
        let cancel = CancellationToken::new();
        let ctx = UnitContext {
            pool: Arc::clone(&self.pool),
            compressor: Arc::clone(&self.compressor),
            completed: Arc::clone(&completed),
            cancel: cancel.clone(),
            policy,
            mode,
        };

        info!(
            "Dispatching {} work units ({} rounds planned, policy={}, mode={})",
            unit_count, planned, policy, mode
        );

        let mut units = JoinSet::new();
        for (unit_id, plan) in plans.into_iter().enumerate() {
            let unit = WorkUnit::new(
                unit_id,
                plan,
                StdRng::seed_from_u64(rng.random()),
                ctx.clone(),
            );
            units.spawn(unit.run());
        }

        let mut reports = Vec::with_capacity(unit_count);
        let mut first_error: Option<LoadGenError> = None;

        // Always drain every unit, even after a failure, so nothing outlives the call.
        while let Some(joined) = units.join_next().await {
            match joined.map_err(LoadGenError::from).and_then(|outcome| outcome) {
                Ok(report) => reports.push(report),
                Err(e) if first_error.is_none() => {
                    error!("Work unit failed, cancelling remaining units: {}", e);
                    cancel.cancel();
                    first_error = Some(e);
                }
                Err(e) => debug!("Further unit failure after cancellation: {}", e),
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        reports.sort_by_key(|r| r.unit_id);

        let completed_rounds = completed.load(Ordering::Acquire);
        let failed_rounds: u64 = reports.iter().map(|r| r.failed).sum();
        debug_assert_eq!(
            completed_rounds,
            reports.iter().map(|r| r.completed).sum::<u64>(),
            "completion counter disagrees with unit reports"
        );

        let elapsed = start.elapsed();
        info!(
            "Load generation finished: {} rounds verified, {} failed, in {:?}",
            completed_rounds, failed_rounds, elapsed
        );

        Ok(RunReport {
            started_at,
            completed_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
            policy,
            mode,
            completed_rounds,
            failed_rounds,
            units: reports,
        })
    }
}
