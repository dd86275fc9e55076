//! Reference feature extractor: hashed character n-grams of text samples.

use crate::core::error::{CompositeError, Result};
use crate::core::traits::FeatureExtractor;
use crate::core::types::FeatureId;
use crate::dataset::entry::FeatureSet;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Extracts every character n-gram of length `1..=max_len` from a string and
/// hashes it to a feature id with 32-bit FNV-1a.
///
/// The hash is fixed, so feature ids are stable across runs and platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramExtractor {
    max_len: usize,
}

impl NgramExtractor {
    /// Create an extractor for n-grams up to `max_len` characters (at least 1).
    pub fn new(max_len: usize) -> Self {
        NgramExtractor {
            max_len: max_len.max(1),
        }
    }

    /// Longest n-gram length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Tag identifying the feature space, for classifier compatibility checks.
    pub fn feature_space(&self) -> String {
        format!("ngram:{}", self.max_len)
    }
}

impl Default for NgramExtractor {
    fn default() -> Self {
        Self::new(3)
    }
}

impl FeatureExtractor for NgramExtractor {
    type Sample = str;

    fn extract(&self, sample: &str) -> Result<FeatureSet> {
        let chars: Vec<char> = sample.trim().chars().collect();
        if chars.is_empty() {
            return Err(CompositeError::classifier("cannot extract features from an empty sample"));
        }

        let mut ids = Vec::new();
        let mut buf = [0u8; 4];
        for start in 0..chars.len() {
            let mut hash = FNV_OFFSET_BASIS;
            for &c in chars[start..].iter().take(self.max_len) {
                for &byte in c.encode_utf8(&mut buf).as_bytes() {
                    hash ^= byte as u32;
                    hash = hash.wrapping_mul(FNV_PRIME);
                }
                ids.push(hash as FeatureId);
            }
        }

        Ok(FeatureSet::new(ids))
    }
}
