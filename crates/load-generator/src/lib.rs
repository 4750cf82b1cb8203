//! Synthetic load generator for netperf.
//!
//! This crate burns a controllable amount of CPU and memory by fanning out
//! many concurrent work units. Each unit waits a random startup delay and then
//! runs a random number of rounds; every round concatenates identifiers from a
//! shared seed pool, compresses the result twice and checks that both outputs
//! agree.
//!
//! # Architecture
//!
//! ```text
//! LoadRequest { units, iterations, delay, policy, mode }
//!        │
//!        ▼
//! ┌──────────────────┐      ┌────────────┐
//! │  LoadGenerator   │─────▶│  SeedPool  │ (128 UUIDs, read-only)
//! │  (dispatcher)    │      └────────────┘
//! └────────┬─────────┘
//!          │ one UnitPlan per unit
//!    ┌─────┼─────────────┐
//!    ▼     ▼             ▼
//! WorkUnit WorkUnit ... WorkUnit     sleep(delay), then N rounds
//!    │     │             │
//!    └─────┴──────┬──────┘
//!                 ▼
//!        AtomicU64 completion counter ──▶ RunReport
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use load_generator::LoadGenerator;
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), load_generator::LoadGenError> {
//! let generator = LoadGenerator::new();
//! let rounds = generator
//!     .run(4, 10, 20, Duration::from_millis(100), Duration::from_millis(300))
//!     .await?;
//! println!("verified {rounds} rounds");
//! # Ok(())
//! # }
//! ```
//!
//! # Failure policies
//!
//! - `strict` (default): the first failed round aborts the run with a
//!   [`LoadGenError::WorkVerification`]; other units are cancelled
//!   cooperatively and joined before the error is returned.
//! - `lenient`: failed rounds are logged and counted in
//!   [`RunReport::failed_rounds`] but never fail the call.

pub mod compress;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod preset;
pub mod report;
pub mod round;
pub mod sampling;
pub mod seed_pool;
mod unit;

pub use compress::{Compressor, GzipCompressor};
pub use config::{FailurePolicy, LoadRequest, RoundMode};
pub use dispatcher::LoadGenerator;
pub use error::LoadGenError;
pub use preset::Preset;
pub use report::{RunReport, UnitReport};
pub use sampling::UnitPlan;
pub use seed_pool::SeedPool;
