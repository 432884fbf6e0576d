use std::sync::Arc;

use labyrinth_common::CellCoord;
use labyrinth_kernel::WorldEvent;
use labyrinth_maze::{Block, Grid};

/// What a single minimap tile shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniMapCell {
    Wall,
    Empty,
    Target,
    Player,
}

/// Overhead map fed purely by world events.
///
/// The display is mirrored on both axes: display row `r` shows grid column
/// `x = width - 1 - r` and display column `c` shows `y = height - 1 - c`.
#[derive(Debug, Clone, Default)]
pub struct MiniMap {
    grid: Option<Arc<Grid>>,
    player: Option<CellCoord>,
    visible: bool,
}

impl MiniMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::LevelChanged { grid, .. } => {
                self.grid = Some(Arc::clone(grid));
                self.player = None;
            }
            WorldEvent::PlayerMoved(cell) => self.player = Some(*cell),
            WorldEvent::PlayerWon { .. } => {}
        }
    }

    pub fn player(&self) -> Option<CellCoord> {
        self.player
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "minimap toggled");
    }

    /// Display position `(row, column)` of a grid cell.
    pub fn display_position(&self, cell: CellCoord) -> Option<(usize, usize)> {
        let grid = self.grid.as_ref()?;
        if !grid.contains(cell) {
            return None;
        }
        Some((
            grid.width() - 1 - cell.x as usize,
            grid.height() - 1 - cell.y as usize,
        ))
    }

    /// Tiles in display order. Empty until a level is known.
    pub fn rows(&self) -> Vec<Vec<MiniMapCell>> {
        let Some(grid) = self.grid.as_ref() else {
            return Vec::new();
        };
        (0..grid.width())
            .rev()
            .map(|x| {
                (0..grid.height())
                    .rev()
                    .map(|y| {
                        let cell = CellCoord::new(x as i32, y as i32);
                        if self.player == Some(cell) {
                            return MiniMapCell::Player;
                        }
                        match grid.get(cell) {
                            Block::Wall => MiniMapCell::Wall,
                            Block::Empty => MiniMapCell::Empty,
                            Block::Target => MiniMapCell::Target,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Text rendering, or an empty string while hidden.
    pub fn render_text(&self) -> String {
        if !self.visible {
            return String::new();
        }
        let mut out = String::new();
        for row in self.rows() {
            for tile in row {
                out.push(match tile {
                    MiniMapCell::Wall => '#',
                    MiniMapCell::Empty => '.',
                    MiniMapCell::Target => 'X',
                    MiniMapCell::Player => '@',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_kernel::{MotionConfig, World};
    use labyrinth_maze::generate_seeded;

    fn fed_minimap() -> (MiniMap, World) {
        let mut world = World::new(MotionConfig::default()).unwrap();
        let rx = world.subscribe();
        world.start_level(generate_seeded(9, 7, 3).unwrap());
        let mut map = MiniMap::new();
        for event in rx.try_iter() {
            map.apply(&event);
        }
        (map, world)
    }

    #[test]
    fn starts_hidden_and_empty() {
        let map = MiniMap::new();
        assert!(!map.is_visible());
        assert!(map.rows().is_empty());
        assert_eq!(map.render_text(), "");
    }

    #[test]
    fn learns_level_and_player_from_events() {
        let (map, world) = fed_minimap();
        assert_eq!(map.player(), Some(world.grid().unwrap().start()));
        let rows = map.rows();
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.len() == 7));
    }

    #[test]
    fn display_is_mirrored_on_both_axes() {
        let (map, _world) = fed_minimap();
        // Start (1, 1) lands one tile in from the bottom-right corner.
        assert_eq!(map.display_position(CellCoord::new(1, 1)), Some((7, 5)));
        assert_eq!(map.display_position(CellCoord::new(0, 0)), Some((8, 6)));
        assert_eq!(map.display_position(CellCoord::new(8, 6)), Some((0, 0)));
        assert_eq!(map.display_position(CellCoord::new(9, 0)), None);
        assert_eq!(map.rows()[7][5], MiniMapCell::Player);
        // Target (7, 5) shows at (1, 1).
        assert_eq!(map.rows()[1][1], MiniMapCell::Target);
    }

    #[test]
    fn toggle_controls_rendering() {
        let (mut map, _world) = fed_minimap();
        map.toggle();
        let text = map.render_text();
        assert_eq!(text.lines().count(), 9);
        assert_eq!(text.matches('@').count(), 1);
        map.toggle();
        assert!(map.render_text().is_empty());
    }

    #[test]
    fn new_level_resets_player_marker() {
        let (mut map, _world) = fed_minimap();
        let grid = Arc::new(generate_seeded(5, 5, 1).unwrap());
        map.apply(&WorldEvent::LevelChanged {
            id: labyrinth_common::LevelId::new(),
            grid,
        });
        assert_eq!(map.player(), None);
        assert_eq!(map.rows().len(), 5);
    }
}
