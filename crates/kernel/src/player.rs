use glam::Vec3;
use labyrinth_common::CellCoord;

use crate::config::MotionConfig;

/// Jump state machine stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpStage {
    Grounded,
    Airborne,
}

/// Jump bookkeeping. Times are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpState {
    pub stage: JumpStage,
    /// Vertical camera offset above the eye height.
    pub offset: f32,
    pub since_started_ms: f32,
    pub since_finished_ms: f32,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            stage: JumpStage::Grounded,
            offset: 0.0,
            since_started_ms: f32::INFINITY,
            // Ready to jump straight away.
            since_finished_ms: f32::INFINITY,
        }
    }
}

/// The player: continuous position and heading in world space.
///
/// Owned by the `World`, mutated only by the motion resolver and level
/// placement. Renderers and the minimap read it through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub(crate) position: Vec3,
    pub(crate) heading: Vec3,
    pub(crate) up: Vec3,
    pub(crate) speed: f32,
    pub(crate) distance_walked: f32,
    pub(crate) jump: JumpState,
    pub(crate) last_cell: Option<CellCoord>,
}

impl Player {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            position: Vec3::new(config.cell_size, config.eye_height, config.cell_size),
            heading: Vec3::new(1.0, 0.0, 1.0).normalize(),
            up: Vec3::Y,
            speed: config.speed,
            distance_walked: 0.0,
            jump: JumpState::default(),
            last_cell: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit heading in the horizontal plane.
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Current speed, including any jump boost.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn distance_walked(&self) -> f32 {
        self.distance_walked
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn jump_offset(&self) -> f32 {
        self.jump.offset
    }

    /// The grid cell the position last mapped into.
    pub fn last_cell(&self) -> Option<CellCoord> {
        self.last_cell
    }

    /// Yaw in radians, increasing with a left turn. Zero faces +X.
    pub fn yaw(&self) -> f32 {
        yaw_of(self.heading)
    }

    /// Put the player at the centre of `cell`. Returns `true` when the cell
    /// differs from the one the player was last in.
    pub(crate) fn place_at(&mut self, cell: CellCoord, config: &MotionConfig) -> bool {
        self.position = cell_center(cell, config);
        let changed = self.last_cell != Some(cell);
        self.last_cell = Some(cell);
        changed
    }

    /// Forget the current cell so the next placement always reports a move.
    pub(crate) fn forget_cell(&mut self) {
        self.last_cell = None;
    }
}

/// Yaw of a horizontal vector, matching `Quat::from_rotation_y`: a positive
/// rotation increases it.
pub fn yaw_of(v: Vec3) -> f32 {
    (-v.z).atan2(v.x)
}

/// Cell a world position falls into.
pub fn world_to_cell(position: Vec3, cell_size: f32) -> CellCoord {
    CellCoord::new(
        (position.x / cell_size).floor() as i32,
        (position.z / cell_size).floor() as i32,
    )
}

/// Centre of `cell` at eye height.
pub fn cell_center(cell: CellCoord, config: &MotionConfig) -> Vec3 {
    Vec3::new(
        (cell.x as f32 + 0.5) * config.cell_size,
        config.eye_height,
        (cell.y as f32 + 0.5) * config.cell_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_grounded_and_still() {
        let p = Player::new(&MotionConfig::default());
        assert_eq!(p.jump().stage, JumpStage::Grounded);
        assert_eq!(p.distance_walked(), 0.0);
        assert!((p.heading().length() - 1.0).abs() < 1e-6);
        assert_eq!(p.heading().y, 0.0);
        assert!(p.last_cell().is_none());
    }

    #[test]
    fn world_to_cell_floors() {
        assert_eq!(world_to_cell(Vec3::new(1.5, 0.8, 1.5), 1.0), CellCoord::new(1, 1));
        assert_eq!(world_to_cell(Vec3::new(-0.1, 0.0, 2.0), 1.0), CellCoord::new(-1, 2));
        assert_eq!(world_to_cell(Vec3::new(5.0, 0.0, 3.9), 2.0), CellCoord::new(2, 1));
    }

    #[test]
    fn cell_center_maps_back() {
        let config = MotionConfig::default();
        let c = CellCoord::new(7, 3);
        let center = cell_center(c, &config);
        assert_eq!(center, Vec3::new(7.5, 0.8, 3.5));
        assert_eq!(world_to_cell(center, config.cell_size), c);
    }

    #[test]
    fn place_reports_cell_change() {
        let config = MotionConfig::default();
        let mut p = Player::new(&config);
        assert!(p.place_at(CellCoord::new(1, 1), &config));
        assert!(!p.place_at(CellCoord::new(1, 1), &config));
        assert!(p.place_at(CellCoord::new(3, 1), &config));
        p.forget_cell();
        assert!(p.place_at(CellCoord::new(3, 1), &config));
    }

    #[test]
    fn yaw_follows_left_rotation() {
        let v = glam::Quat::from_rotation_y(0.5) * Vec3::X;
        assert!((yaw_of(v) - 0.5).abs() < 1e-6);
        assert!(yaw_of(Vec3::X).abs() < 1e-6);
    }
}
