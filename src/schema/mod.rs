//! Schema module - Configuration and seeding types for Lattice Life grids.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
