//! Compression step used as CPU busy-work.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Something that turns a payload into compressed bytes.
///
/// Implementations must be deterministic: the same input always produces the
/// same output. Rounds rely on that to self-verify.
pub trait Compressor: Send + Sync + 'static {
    /// Compress `input` into a fresh buffer.
    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Gzip compressor backed by flate2.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    /// Create a compressor with the given level (0-9).
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(input.len()), self.level);
        encoder.write_all(input)?;
        encoder.finish()
    }
}

/// Digest used to compare two compressed outputs.
pub fn digest(bytes: &[u8]) -> blake3::Hash {
    blake3::hash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    const FIXED: &str = "3f2b8c1e-52a4-4f6e-9d1a-7c0b2e4f8a91b6d0e2f4-1c3a-4b5d-8e7f-9a0b1c2d3e4f";

    #[test]
    fn test_compress_twice_same_digest() {
        let compressor = GzipCompressor::default();
        for _ in 0..50 {
            let first = compressor.compress(FIXED.as_bytes()).unwrap();
            let second = compressor.compress(FIXED.as_bytes()).unwrap();
            assert_eq!(digest(&first), digest(&second));
        }
    }

    #[test]
    fn test_output_is_gzip() {
        let compressed = GzipCompressor::new(9).compress(FIXED.as_bytes()).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoded = String::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, FIXED);
    }

    #[test]
    fn test_different_input_different_digest() {
        let compressor = GzipCompressor::default();
        let a = compressor.compress(b"alpha").unwrap();
        let b = compressor.compress(b"bravo").unwrap();
        assert_ne!(digest(&a), digest(&b));
    }

    #[test]
    fn test_level_is_clamped() {
        let compressor = GzipCompressor::new(42);
        assert_eq!(compressor.level.level(), 9);
    }
}
