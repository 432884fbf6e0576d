//! Maze: the grid model and the generator that carves it.
//!
//! # Invariants
//! - A generated grid is a perfect maze: every open cell is reachable from
//!   every other through exactly one path.
//! - Exactly one cell is the target.
//! - A grid is immutable once generated; a new level means a new grid.
//! - Lookups outside the grid read as walls.

mod generator;
mod grid;
mod solve;

pub use generator::{MazeError, generate, generate_seeded, generate_with};
pub use grid::{Block, Grid};

pub fn crate_info() -> &'static str {
    "labyrinth-maze v0.1.0"
}
