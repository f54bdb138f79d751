//! Bit-packed generation fingerprints for cycle detection.

use super::{ActiveSet, GridSize};

/// Cells per signature word.
const BITS_PER_WORD: usize = 64;

/// Compact fingerprint of an active set on a fixed-size torus.
///
/// Cell `i = y * columns + x` maps to bit `i % 64` of word `i / 64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationSignature {
    words: Vec<u64>,
}

impl GenerationSignature {
    /// Number of words needed for a grid of the given size.
    #[inline]
    pub fn word_count(size: GridSize) -> usize {
        size.cell_count().div_ceil(BITS_PER_WORD)
    }

    /// Fingerprint an active set. Off-grid locations are ignored.
    pub fn from_active(active: &ActiveSet, size: GridSize) -> Self {
        let mut words = vec![0u64; Self::word_count(size)];
        for loc in active.iter().filter(|&loc| size.contains(loc)) {
            let i = size.index(loc);
            words[i / BITS_PER_WORD] |= 1u64 << (i % BITS_PER_WORD);
        }
        Self { words }
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Number of active cells encoded.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }
}
