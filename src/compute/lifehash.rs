//! LifeHash - deterministic seed-to-pattern generation.
//!
//! A SHA-256 digest of the seed string fills a 16x16 torus, which is evolved
//! until it repeats a previous generation, dies out, or hits the generation
//! cap. The surviving generation is mirrored on both axes into a 32x32
//! pattern. Identical seed and rule variants always give the identical
//! pattern.

use std::collections::HashMap;

use log::debug;
use sha2::{Digest, Sha256};

use crate::schema::RuleVariants;

use super::{ActiveSet, CellLocation, GenerationSignature, GridSize, step_generation};

/// Side length of the torus the digest is evolved on.
pub const SEED_SIZE: i32 = 16;

/// Side length of the symmetrized output pattern.
pub const OUTPUT_SIZE: i32 = SEED_SIZE * 2;

/// Maximum number of generations evolved before giving up on cycle detection.
pub const MAX_GENERATIONS: usize = 64;

const SEED_GRID: GridSize = GridSize::square(SEED_SIZE);

/// Why evolution stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Termination {
    /// A generation repeated; `period` 1 is a still life.
    Cycle { period: usize },
    /// The next generation was empty; the last live generation was kept.
    Extinct,
    /// Ran `MAX_GENERATIONS` steps without repeating.
    GenerationCap,
}

/// Result of a LifeHash run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeHashPattern {
    /// Symmetrized 32x32 pattern.
    pub cells: ActiveSet,
    /// Number of steps evolved.
    pub generations: usize,
    pub termination: Termination,
}

/// Generation-0 pattern: digest bit `i` (MSB first within each byte) marks cell `(i % 16, i / 16)`.
pub fn initial_pattern(seed: &str) -> ActiveSet {
    let digest = Sha256::digest(seed.as_bytes());

    let mut active = ActiveSet::with_capacity(128);
    for (byte_idx, byte) in digest.iter().enumerate() {
        for bit in 0..8 {
            if byte & (0x80 >> bit) != 0 {
                let i = (byte_idx * 8 + bit) as i32;
                active.insert(CellLocation::new(i % SEED_SIZE, i / SEED_SIZE));
            }
        }
    }
    active
}

/// Generate the symmetrized 32x32 pattern for a seed string.
pub fn generate_pattern(seed: &str, variants: RuleVariants) -> LifeHashPattern {
    let (evolved, generations, termination) = evolve(initial_pattern(seed), variants);
    debug!(
        "LifeHash {:?}: {} generations, {:?}, {} cells",
        seed,
        generations,
        termination,
        evolved.len()
    );

    LifeHashPattern {
        cells: symmetrize(&evolved),
        generations,
        termination,
    }
}

/// Evolve a 16x16 pattern until it cycles, dies out or reaches the cap.
fn evolve(initial: ActiveSet, variants: RuleVariants) -> (ActiveSet, usize, Termination) {
    let mut seen: HashMap<GenerationSignature, usize> = HashMap::with_capacity(MAX_GENERATIONS + 1);
    seen.insert(GenerationSignature::from_active(&initial, SEED_GRID), 0);

    let mut current = initial;
    for generation in 1..=MAX_GENERATIONS {
        let next = step_generation(&current, SEED_GRID, variants);
        if next.is_empty() {
            return (current, generation, Termination::Extinct);
        }

        let signature = GenerationSignature::from_active(&next, SEED_GRID);
        if let Some(&first) = seen.get(&signature) {
            let period = generation - first;
            return (next, generation, Termination::Cycle { period });
        }
        seen.insert(signature, generation);
        current = next;
    }

    (current, MAX_GENERATIONS, Termination::GenerationCap)
}

/// Mirror a 16x16 pattern on both axes into 32x32.
fn symmetrize(pattern: &ActiveSet) -> ActiveSet {
    let far = OUTPUT_SIZE - 1;
    let mut out = ActiveSet::with_capacity(pattern.len() * 4);
    for CellLocation { x, y } in pattern.iter() {
        out.insert(CellLocation::new(x, y));
        out.insert(CellLocation::new(far - x, y));
        out.insert(CellLocation::new(x, far - y));
        out.insert(CellLocation::new(far - x, far - y));
    }
    out
}
