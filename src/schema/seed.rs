//! Seed types for initializing Lattice Life grids.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::compute::{ActiveSet, CellLocation, GridSize, generate_pattern, lifehash};

use super::{ConfigError, RuleVariants};

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding the automaton.
    pub pattern: Pattern,
    /// Centers of radial selections started in Latix mode.
    #[serde(default)]
    pub selections: Vec<(i32, i32)>,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Glider { x: 1, y: 1 },
            selections: vec![(8, 8)],
        }
    }
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// No live cells.
    Empty,
    /// Glider heading toward +x, +y with its bounding box at (x, y).
    Glider { x: i32, y: i32 },
    /// Horizontal blinker starting at (x, y).
    Blinker { x: i32, y: i32 },
    /// Uniform random soup.
    Random {
        /// Probability of each cell being live (0.0-1.0).
        density: f32,
        /// Random seed.
        seed: u64,
    },
    /// Explicit live cells.
    Cells { cells: Vec<(i32, i32)> },
    /// LifeHash pattern for a seed string, centered on the grid.
    LifeHash { text: String },
}

const GLIDER: [(i32, i32); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

impl Seed {
    /// Generate the initial live set. Locations are wrapped onto the torus.
    pub fn generate(&self, size: GridSize, variants: RuleVariants) -> Result<ActiveSet, ConfigError> {
        let cells: ActiveSet = match &self.pattern {
            Pattern::Empty => ActiveSet::new(),
            Pattern::Glider { x, y } => GLIDER
                .iter()
                .map(|&(dx, dy)| CellLocation::new(x + dx, y + dy))
                .collect(),
            Pattern::Blinker { x, y } => (0..3).map(|dx| CellLocation::new(x + dx, *y)).collect(),
            Pattern::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(ConfigError::InvalidDensity(*density));
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                let p = f64::from(*density);
                size.locations().filter(|_| rng.gen_bool(p)).collect()
            }
            Pattern::Cells { cells } => cells.iter().copied().map(CellLocation::from).collect(),
            Pattern::LifeHash { text } => {
                let ox = (size.columns() - lifehash::OUTPUT_SIZE) / 2;
                let oy = (size.rows() - lifehash::OUTPUT_SIZE) / 2;
                generate_pattern(text, variants)
                    .cells
                    .iter()
                    .map(|loc| loc.offset(ox, oy))
                    .collect()
            }
        };

        Ok(cells.into_iter().map(|loc| loc.wrapped(size)).collect())
    }

    /// Selection centers as locations.
    pub fn selection_centers(&self) -> impl Iterator<Item = CellLocation> + '_ {
        self.selections.iter().copied().map(CellLocation::from)
    }
}
