//! A single busy-work round: build a payload, compress it twice, compare.

use crate::compress::{digest, Compressor};
use crate::error::{LoadGenError, Result};
use crate::seed_pool::SeedPool;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of seed pool entries concatenated into one payload.
pub const SEGMENTS_PER_PAYLOAD: usize = 10;

/// Concatenate [`SEGMENTS_PER_PAYLOAD`] entries drawn with replacement and
/// lowercase the result.
pub fn build_payload<R: Rng>(pool: &SeedPool, rng: &mut R) -> String {
    let mut payload = String::new();
    for _ in 0..SEGMENTS_PER_PAYLOAD {
        payload.push_str(pool.sample(rng));
    }
    payload.to_lowercase()
}

/// Compress `payload` twice and check that both outputs carry the same digest.
pub fn verify_payload<C: Compressor + ?Sized>(
    compressor: &C,
    payload: &str,
    unit_id: usize,
    round: u64,
) -> Result<()> {
    let first = digest(&compressor.compress(payload.as_bytes())?);
    let second = digest(&compressor.compress(payload.as_bytes())?);

    if first != second {
        return Err(LoadGenError::WorkVerification {
            unit_id,
            round,
            first: first.to_hex().to_string(),
            second: second.to_hex().to_string(),
        });
    }
    Ok(())
}

/// Run one round and bump `completed` when it verifies.
pub fn run_round<C: Compressor + ?Sized, R: Rng>(
    pool: &SeedPool,
    compressor: &C,
    completed: &AtomicU64,
    unit_id: usize,
    round: u64,
    rng: &mut R,
) -> Result<()> {
    let payload = build_payload(pool, rng);
    verify_payload(compressor, &payload, unit_id, round)?;
    completed.fetch_add(1, Ordering::Relaxed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::GzipCompressor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::AtomicUsize;

    /// Appends a call counter so no two outputs ever match.
    struct Corrupting(AtomicUsize);

    impl Compressor for Corrupting {
        fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
            let call = self.0.fetch_add(1, Ordering::Relaxed);
            let mut out = input.to_vec();
            out.extend_from_slice(&call.to_le_bytes());
            Ok(out)
        }
    }

    struct Broken;

    impl Compressor for Broken {
        fn compress(&self, _input: &[u8]) -> std::io::Result<Vec<u8>> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    fn pool() -> SeedPool {
        SeedPool::generate(&mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_payload_shape() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(1);
        let payload = build_payload(&pool, &mut rng);

        // Every entry is a 36-char hyphenated UUID.
        assert_eq!(payload.len(), 36 * SEGMENTS_PER_PAYLOAD);
        assert_eq!(payload, payload.to_lowercase());
    }

    #[test]
    fn test_round_counts_on_success() {
        let pool = pool();
        let counter = AtomicU64::new(0);
        let mut rng = StdRng::seed_from_u64(1);
        let compressor = GzipCompressor::default();

        for round in 0..5 {
            run_round(&pool, &compressor, &counter, 0, round, &mut rng).unwrap();
        }
        assert_eq!(counter.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_mismatch_is_verification_error() {
        let pool = pool();
        let counter = AtomicU64::new(0);
        let mut rng = StdRng::seed_from_u64(1);
        let compressor = Corrupting(AtomicUsize::new(0));

        let result = run_round(&pool, &compressor, &counter, 3, 9, &mut rng);
        match result {
            Err(LoadGenError::WorkVerification {
                unit_id,
                round,
                first,
                second,
            }) => {
                assert_eq!(unit_id, 3);
                assert_eq!(round, 9);
                assert_ne!(first, second);
            }
            other => panic!("Expected verification error, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_compressor_error_propagates() {
        let result = verify_payload(&Broken, "payload", 0, 0);
        assert!(matches!(result, Err(LoadGenError::Compression(_))));
    }
}
