//! Pool of random identifier strings used as payload building blocks.

use rand::Rng;
use uuid::Uuid;

/// Number of identifiers in a default pool.
pub const DEFAULT_POOL_SIZE: usize = 128;

/// Immutable set of random UUID strings.
///
/// Built once per generator and shared across units behind an `Arc`; it is
/// never written after construction so readers need no locking.
#[derive(Debug, Clone)]
pub struct SeedPool {
    entries: Vec<String>,
}

impl SeedPool {
    /// Build a pool of [`DEFAULT_POOL_SIZE`] identifiers from the given RNG.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::with_size(rng, DEFAULT_POOL_SIZE)
    }

    /// Build a pool of `size` identifiers from the given RNG.
    ///
    /// A zero size is bumped to one so sampling always has something to pick.
    pub fn with_size<R: Rng>(rng: &mut R, size: usize) -> Self {
        let entries = (0..size.max(1))
            .map(|_| random_uuid(rng).to_string())
            .collect();
        Self { entries }
    }

    /// Pick one entry uniformly at random.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> &str {
        &self.entries[rng.random_range(0..self.entries.len())]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a pool holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// UUID v4 drawn from the provided RNG, so seeded pools are reproducible.
fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // RFC 4122 variant

    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_default_size() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = SeedPool::generate(&mut rng);
        assert_eq!(pool.len(), DEFAULT_POOL_SIZE);
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_entries_are_uuid_v4() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = SeedPool::with_size(&mut rng, 16);
        for entry in pool.iter() {
            let uuid = Uuid::parse_str(entry).unwrap();
            assert_eq!(uuid.get_version_num(), 4);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let pool1 = SeedPool::generate(&mut StdRng::seed_from_u64(42));
        let pool2 = SeedPool::generate(&mut StdRng::seed_from_u64(42));
        assert!(pool1.iter().eq(pool2.iter()));
    }

    #[test]
    fn test_sample_reaches_whole_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = SeedPool::with_size(&mut rng, 4);
        let seen: HashSet<&str> = (0..500).map(|_| pool.sample(&mut rng)).collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_zero_size_is_bumped() {
        let pool = SeedPool::with_size(&mut StdRng::seed_from_u64(3), 0);
        assert_eq!(pool.len(), 1);
    }
}
