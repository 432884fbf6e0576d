//! Developer Tooling: world inspector and an autopilot that walks the
//! solution path through the regular input pipeline.
//!
//! # Invariants
//! - Tools only read world state or produce input intents.

mod autopilot;
mod inspector;

pub use autopilot::Autopilot;
pub use inspector::{WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "labyrinth-tools v0.1.0"
}
