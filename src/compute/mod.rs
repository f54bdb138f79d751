//! Compute module - Rule engines and geometry for Lattice Life.

mod circle;
mod color;
mod generation;
mod grid;
mod latix;
mod location;
mod signature;

pub mod lifehash;

pub use circle::*;
pub use color::*;
pub use generation::*;
pub use grid::*;
pub use latix::*;
pub use lifehash::{LifeHashPattern, Termination, generate_pattern};
pub use location::*;
pub use signature::*;
