//! World Kernel: authoritative maze world, player motion, level flow.
//!
//! # Invariants
//! - Motion is pure with respect to (player, grid, elapsed, intent).
//! - The player never ends a tick inside a wall unless god mode is on.
//! - `PlayerWon` fires at most once per level.
//! - No tick runs and no time accumulates while paused.

pub mod clock;
pub mod config;
pub mod motion;
pub mod player;
pub mod session;
pub mod world;

pub use clock::FrameClock;
pub use config::{ConfigError, GameConfig, MazeConfig, MotionConfig, SessionConfig};
pub use motion::{MotionOutcome, MotionResolver};
pub use player::{JumpStage, JumpState, Player, cell_center, world_to_cell, yaw_of};
pub use session::{Session, SessionError, SessionPhase};
pub use world::{Level, World, WorldEvent};
