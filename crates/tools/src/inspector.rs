use std::fmt;

use labyrinth_common::{CellCoord, LevelId};
use labyrinth_kernel::{World, world_to_cell};

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let player = world.player();
        let level = world.level();
        WorldSummary {
            tick_ms: world.local_tick(),
            level: level.map(|l| l.id),
            size: level.map(|l| (l.grid.width(), l.grid.height())),
            player_cell: world_to_cell(player.position(), world.config().cell_size),
            distance_walked: player.distance_walked(),
            won: world.has_won(),
            paused: world.is_paused(),
            pending_events: world.events().len(),
        }
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub tick_ms: f64,
    pub level: Option<LevelId>,
    pub size: Option<(usize, usize)>,
    pub player_cell: CellCoord,
    pub distance_walked: f32,
    pub won: bool,
    pub paused: bool,
    pub pending_events: usize,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.0}ms ", self.tick_ms)?;
        match (self.level, self.size) {
            (Some(id), Some((w, h))) => write!(f, "level={id} {w}x{h} ")?,
            _ => write!(f, "level=none ")?,
        }
        write!(
            f,
            "player={} walked={:.2} won={} paused={} pending={}",
            self.player_cell, self.distance_walked, self.won, self.paused, self.pending_events
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_common::InputIntent;
    use labyrinth_kernel::MotionConfig;
    use labyrinth_maze::generate_seeded;

    #[test]
    fn summary_of_empty_world() {
        let world = World::new(MotionConfig::default()).unwrap();
        let s = WorldInspector::summary(&world);
        assert_eq!(s.tick_ms, 0.0);
        assert!(s.level.is_none());
        assert!(!s.won);
        assert!(s.to_string().contains("level=none"));
    }

    #[test]
    fn summary_tracks_level_and_player() {
        let mut world = World::new(MotionConfig::default()).unwrap();
        let id = world.start_level(generate_seeded(11, 11, 4).unwrap());
        world.tick(100.0, &InputIntent::IDLE);
        let s = WorldInspector::summary(&world);
        assert_eq!(s.level, Some(id));
        assert_eq!(s.size, Some((11, 11)));
        assert_eq!(s.player_cell, CellCoord::new(1, 1));
        assert_eq!(s.tick_ms, 100.0);
        // LevelChanged and the initial PlayerMoved.
        assert_eq!(s.pending_events, 2);
        assert!(s.to_string().contains("11x11"));
    }

    #[test]
    fn summary_reports_pause() {
        let mut world = World::new(MotionConfig::default()).unwrap();
        world.pause();
        assert!(WorldInspector::summary(&world).paused);
    }
}
