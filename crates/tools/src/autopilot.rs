use std::f32::consts::{PI, TAU};

use glam::Vec3;
use labyrinth_common::{CellCoord, InputIntent, LevelId};
use labyrinth_kernel::{World, cell_center, world_to_cell, yaw_of};

/// Heading error below which the autopilot walks instead of turning.
const TURN_TOLERANCE: f32 = 0.05;
/// Distance to a waypoint's centre at which it counts as reached.
const ARRIVE_RADIUS: f32 = 0.1;

/// Drives the player along the shortest path to the target by producing
/// ordinary input intents, so every move goes through collision.
#[derive(Debug, Default)]
pub struct Autopilot {
    level: Option<LevelId>,
    path: Vec<CellCoord>,
    next: usize,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The planned path, starting at the cell the player was in when
    /// planning happened.
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Whether every waypoint of the current plan has been reached.
    pub fn is_finished(&self) -> bool {
        self.level.is_some() && self.next >= self.path.len()
    }

    /// Intent for the next tick. Replans whenever the level changes.
    pub fn intent(&mut self, world: &World) -> InputIntent {
        let Some(level) = world.level() else {
            return InputIntent::IDLE;
        };
        let config = world.config();
        let player = world.player();

        if self.level != Some(level.id) {
            let here = world_to_cell(player.position(), config.cell_size);
            self.path = level.grid.solve(here, level.grid.target()).unwrap_or_default();
            self.next = 0;
            self.level = Some(level.id);
            tracing::debug!(steps = self.path.len(), "autopilot planned route");
        }

        while let Some(&waypoint) = self.path.get(self.next) {
            let to_goal = horizontal(cell_center(waypoint, config) - player.position());
            if to_goal.length() >= ARRIVE_RADIUS {
                let error = wrap_angle(yaw_of(to_goal) - player.yaw());
                return if error > TURN_TOLERANCE {
                    InputIntent::turn_left()
                } else if error < -TURN_TOLERANCE {
                    InputIntent::turn_right()
                } else {
                    InputIntent::forward()
                };
            }
            self.next += 1;
        }
        InputIntent::IDLE
    }
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Wrap an angle into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
