//! Rendering Adapter: read-only views of the maze world.
//!
//! # Invariants
//! - Renderers cannot mutate world truth.
//! - Render state derives from the grid, the player and world events.
//!
//! The GPU pipeline lives outside this workspace. This crate provides the
//! camera it consumes, an ASCII renderer for the CLI and tests, and the
//! minimap model.

mod minimap;
mod renderer;

pub use minimap::{MiniMap, MiniMapCell};
pub use renderer::{AsciiRenderer, CameraView, Renderer};

pub fn crate_info() -> &'static str {
    "labyrinth-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
