//! Shared types for the labyrinth core.
//!
//! # Invariants
//! - Cell coordinates are signed so that probes outside the grid stay
//!   representable; bounds are checked by the grid, never by callers.

pub mod types;

pub use types::{CellCoord, Direction, InputIntent, LevelId};
