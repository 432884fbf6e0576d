//! Input: physical keys mapped to a per-tick movement intent and discrete
//! actions.
//!
//! # Invariants
//! - The kernel consumes `InputIntent` snapshots, never raw key events.
//! - Key repeat never re-triggers anything.

pub mod action;
pub mod keyboard;

pub use action::Action;
pub use keyboard::{Binding, Key, KeyBindings, KeyboardState, UnknownKey};

pub fn crate_info() -> &'static str {
    "labyrinth-input v0.1.0"
}
