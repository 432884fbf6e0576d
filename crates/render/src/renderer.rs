use std::fmt::Write as _;

use glam::{Mat4, Vec3};
use labyrinth_common::CellCoord;
use labyrinth_kernel::{Player, World, world_to_cell};
use labyrinth_maze::Block;

/// First-person camera derived from the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 80.0,
        }
    }
}

impl CameraView {
    /// Eye at the player's position lifted by the jump offset, looking
    /// along the heading.
    pub fn from_player(player: &Player) -> Self {
        let eye = player.position() + Vec3::Y * player.jump_offset();
        Self {
            eye,
            target: eye + player.heading(),
            up: player.up(),
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view, then produces output. It
/// never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and view.
    fn render(&self, world: &World, view: &CameraView) -> Self::Output;
}

/// Text renderer: the maze top-down with the player marked `@`.
#[derive(Debug, Default)]
pub struct AsciiRenderer;

impl AsciiRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &CameraView) -> String {
        let mut out = String::new();
        let player = world.player();
        let _ = writeln!(
            out,
            "=== Maze (t={:.0}ms{}) ===",
            world.local_tick(),
            if world.is_paused() { ", paused" } else { "" }
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2})",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z
        );

        let Some(grid) = world.grid() else {
            out.push_str("(no level)\n");
            return out;
        };
        let here = world_to_cell(player.position(), world.config().cell_size);
        for y in (0..grid.height() as i32).rev() {
            for x in 0..grid.width() as i32 {
                let cell = CellCoord::new(x, y);
                let ch = if cell == here {
                    '@'
                } else {
                    match grid.get(cell) {
                        Block::Wall => '#',
                        Block::Empty => ' ',
                        Block::Target => 'X',
                    }
                };
                out.push(ch);
            }
            out.push('\n');
        }
        let _ = writeln!(out, "Walked: {:.2}", player.distance_walked());
        out
    }
}
