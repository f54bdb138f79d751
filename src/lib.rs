//! Lattice Life - toroidal life, hash-seeded patterns and radial growth.
//!
//! This crate provides the rule engines behind a grid-based automaton with
//! three display modes:
//!
//! - **Life**: a toroidal Conway automaton with HighLife and over-population
//!   variants, stepped sparsely over the live set.
//! - **LifeHash**: a deterministic 32x32 pattern derived from a SHA-256 digest
//!   of a seed string, evolved until it cycles and mirrored on both axes.
//! - **Latix**: radial "ink spreading" selections that paint discrete circle
//!   perimeters, with occlusion by younger growth and a shared circle cache.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and seed types
//! - `compute`: Coordinate model, engines, circle geometry and grid traits
//!
//! Rendering, input handling and persistence live outside this crate. The
//! engines talk to a grid through the `GridAccess` and `ChangeSink` traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use lattice_life::{
//!     compute::{CellGrid, GridSize, LifeSimulation, generate_pattern},
//!     schema::{DisplayMode, RuleVariants},
//! };
//!
//! let size = GridSize::new(48, 64).unwrap();
//! let mut grid = CellGrid::new(size, DisplayMode::Life);
//!
//! // Seed the automaton from a LifeHash pattern and run it
//! let pattern = generate_pattern("hello", RuleVariants::CONWAY);
//! let mut life = LifeSimulation::new(size, RuleVariants::CONWAY);
//! life.seed(pattern.cells, &mut grid);
//! let stats = life.run(100, &mut grid);
//!
//! println!("Population after {} generations: {}", stats.generation, stats.population);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    ActiveSet, CellLocation, GridSize, LifeSimulation, RadialGrowthEngine, generate_pattern,
    step_generation,
};
pub use schema::{DisplayMode, RuleVariants, Seed, SimulationConfig};
