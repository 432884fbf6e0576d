use labyrinth_common::{InputIntent, LevelId};
use labyrinth_maze::{MazeError, generate_with};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, GameConfig};
use crate::world::{World, WorldEvent};

/// Errors from starting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Where the session is in the level loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionPhase {
    /// Level shown, world paused until the countdown runs out.
    Countdown { remaining_ms: f32 },
    /// World ticking.
    Playing,
    /// Target reached; world paused until `new_game`.
    Won,
}

/// The level loop: generate a level, count down, play until won, wait for a
/// new game, repeat.
///
/// Levels are drawn from one seeded random source, so a session seed
/// reproduces the whole sequence of mazes.
pub struct Session {
    config: GameConfig,
    world: World,
    rng: StdRng,
    phase: SessionPhase,
    levels_completed: u32,
}

impl Session {
    /// Validate `config`, then start a session and generate its first level.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let rng = match config.maze.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            world: World::new(config.motion.clone())?,
            config,
            rng,
            phase: SessionPhase::Playing,
            levels_completed: 0,
        };
        session.new_level()?;
        Ok(session)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn levels_completed(&self) -> u32 {
        self.levels_completed
    }

    /// Whole seconds left on the countdown overlay, if one is showing.
    pub fn countdown_seconds(&self) -> Option<u32> {
        match self.phase {
            SessionPhase::Countdown { remaining_ms } => Some((remaining_ms / 1000.0).ceil() as u32),
            _ => None,
        }
    }

    fn new_level(&mut self) -> Result<LevelId, MazeError> {
        let maze = &self.config.maze;
        let grid = generate_with(maze.width, maze.height, &mut self.rng)?;
        let id = self.world.start_level(grid);
        self.world.pause();
        self.phase = SessionPhase::Countdown {
            remaining_ms: self.config.session.countdown_ms,
        };
        Ok(id)
    }

    /// Start the next level after a win. Returns `None` while a level is
    /// still in progress.
    pub fn new_game(&mut self) -> Result<Option<LevelId>, MazeError> {
        if self.phase != SessionPhase::Won {
            return Ok(None);
        }
        self.new_level().map(Some)
    }

    /// Run one host frame and return the events raised during it.
    pub fn frame(&mut self, elapsed_ms: f32, intent: &InputIntent) -> Vec<WorldEvent> {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, self.config.session.max_frame_ms)
        } else {
            0.0
        };
        match self.phase {
            SessionPhase::Countdown { remaining_ms } => {
                let remaining_ms = remaining_ms - elapsed;
                if remaining_ms <= 0.0 {
                    tracing::debug!("countdown finished");
                    self.world.unpause();
                    self.phase = SessionPhase::Playing;
                } else {
                    self.phase = SessionPhase::Countdown { remaining_ms };
                }
            }
            SessionPhase::Playing => {
                self.world.tick(elapsed, intent);
                if self.world.has_won() {
                    self.world.pause();
                    self.levels_completed += 1;
                    self.phase = SessionPhase::Won;
                    tracing::info!(levels = self.levels_completed, "level complete");
                }
            }
            SessionPhase::Won => {}
        }
        self.world.drain_events()
    }
}
