//! Error types for the load generator.

use thiserror::Error;

/// Errors that can occur while generating load.
#[derive(Error, Debug)]
pub enum LoadGenError {
    /// Request bounds are inverted or otherwise unusable.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The two compressed copies of one payload disagree.
    #[error(
        "Work verification failed in unit {unit_id}, round {round}: digest {first} != {second}"
    )]
    WorkVerification {
        unit_id: usize,
        round: u64,
        first: String,
        second: String,
    },

    /// The compressor itself failed.
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// A unit task panicked or was aborted by the runtime.
    #[error("Work unit task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl LoadGenError {
    /// Whether this error came out of a single round and is therefore subject
    /// to the failure policy.
    pub fn is_round_failure(&self) -> bool {
        matches!(
            self,
            LoadGenError::WorkVerification { .. } | LoadGenError::Compression(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = LoadGenError> = std::result::Result<T, E>;
