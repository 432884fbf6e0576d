use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use labyrinth_common::{CellCoord, InputIntent, LevelId};
use labyrinth_maze::Grid;

use crate::config::{ConfigError, MotionConfig};
use crate::motion::MotionResolver;
use crate::player::Player;

/// A domain event raised by the world.
///
/// Subscribers (minimap, audio, UI overlays) receive these instead of
/// polling world state.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// A new level was installed. Carries the full grid for minimaps.
    LevelChanged { id: LevelId, grid: Arc<Grid> },
    /// The player entered a different grid cell.
    PlayerMoved(CellCoord),
    /// The player came within the win radius of the target. Raised at most
    /// once per level.
    PlayerWon { id: LevelId },
}

/// The active level.
#[derive(Debug, Clone)]
pub struct Level {
    pub id: LevelId,
    pub grid: Arc<Grid>,
    won: bool,
}

impl Level {
    pub fn has_won(&self) -> bool {
        self.won
    }
}

/// The authoritative game state: the active grid and the player.
///
/// All mutations go through explicit operations and every observable change
/// raises a `WorldEvent`, both appended to the log and sent to subscribers.
/// Level replacement takes `&mut self`, so it can never overlap a tick.
pub struct World {
    level: Option<Level>,
    player: Player,
    resolver: MotionResolver,
    /// Accumulated unpaused milliseconds.
    local_tick: f64,
    paused: bool,
    /// Append-only event log, drained by the host each frame.
    event_log: Vec<WorldEvent>,
    subscribers: Vec<Sender<WorldEvent>>,
}

impl World {
    /// An empty world with no level loaded. Rejects motion tuning that
    /// fails `MotionConfig::validate`.
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            level: None,
            player: Player::new(&config),
            resolver: MotionResolver::new(config)?,
            local_tick: 0.0,
            paused: false,
            event_log: Vec::new(),
            subscribers: Vec::new(),
        })
    }

    pub fn config(&self) -> &MotionConfig {
        self.resolver.config()
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.level.as_ref().map(|l| l.grid.as_ref())
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Accumulated unpaused milliseconds.
    pub fn local_tick(&self) -> f64 {
        self.local_tick
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the current level has been won.
    pub fn has_won(&self) -> bool {
        self.level.as_ref().is_some_and(Level::has_won)
    }

    /// Receive every event raised from now on.
    pub fn subscribe(&mut self) -> Receiver<WorldEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    fn raise(&mut self, event: WorldEvent) {
        tracing::debug!(?event, "world event");
        // Dropped receivers unsubscribe themselves.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        self.event_log.push(event);
    }

    /// Install a new level and put the player on its start cell.
    ///
    /// Raises `LevelChanged` followed by `PlayerMoved` for the start cell.
    pub fn start_level(&mut self, grid: impl Into<Arc<Grid>>) -> LevelId {
        let grid = grid.into();
        let id = LevelId::new();
        let start = grid.start();
        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            goal = %grid.target(),
            "level started"
        );

        self.level = Some(Level {
            id,
            grid: Arc::clone(&grid),
            won: false,
        });
        self.raise(WorldEvent::LevelChanged { id, grid });

        self.player.forget_cell();
        self.place_player(start);
        id
    }

    /// Teleport the player to the centre of `cell`.
    pub fn place_player(&mut self, cell: CellCoord) {
        let config = self.resolver.config().clone();
        if self.player.place_at(cell, &config) {
            self.raise(WorldEvent::PlayerMoved(cell));
        }
    }

    /// Advance the simulation by `elapsed_ms`. Does nothing while paused, and
    /// paused time is never added to `local_tick`.
    pub fn tick(&mut self, elapsed_ms: f32, intent: &InputIntent) {
        if self.paused {
            return;
        }
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.local_tick += f64::from(elapsed_ms);
        }
        let Some(level) = self.level.as_ref() else {
            tracing::trace!("tick without a level");
            return;
        };

        let grid = Arc::clone(&level.grid);
        let id = level.id;
        let outcome = self.resolver.tick(&mut self.player, &grid, elapsed_ms, intent);

        for cell in outcome.moved {
            self.raise(WorldEvent::PlayerMoved(cell));
        }

        if outcome.reached_target {
            let first = self.level.as_mut().is_some_and(|l| !std::mem::replace(&mut l.won, true));
            if first {
                tracing::info!(distance = self.player.distance_walked(), "level won");
                self.raise(WorldEvent::PlayerWon { id });
            }
        }
    }
}
