use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level game configuration. Every section falls back to its defaults
/// when missing from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub motion: MotionConfig,
    pub session: SessionConfig,
}

/// Size and seed of generated levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    /// Seed for the level sequence. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 35,
            height: 35,
            seed: None,
        }
    }
}

/// Player motion and collision tuning. Times are milliseconds, distances
/// world units, speeds world units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Walking speed.
    pub speed: f32,
    /// Backward walking runs at `speed * backward_speed_scale`.
    pub backward_speed_scale: f32,
    /// Heading rotation in radians per millisecond of held turn key.
    pub turn_rate: f32,
    /// How far past the movement delta the wall probe looks.
    pub probe_margin: f32,
    /// World units per grid cell.
    pub cell_size: f32,
    /// Height of the player's eye above the floor.
    pub eye_height: f32,
    /// Longest single collision step; longer moves are sub-stepped.
    pub max_step: f32,
    /// Chebyshev distance to the target below which the level is won.
    pub win_radius: i32,
    pub jump_duration_ms: f32,
    /// Grounded time required before another jump.
    pub jump_cooldown_ms: f32,
    /// Peak jump offset.
    pub jump_height: f32,
    /// Added to `speed` while airborne.
    pub jump_speed_boost: f32,
    /// Disables wall collision. Nothing in the game toggles it.
    pub god_mode: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            backward_speed_scale: 0.8,
            turn_rate: 0.004,
            probe_margin: 0.15,
            cell_size: 1.0,
            eye_height: 0.8,
            max_step: 0.25,
            win_radius: 2,
            jump_duration_ms: 500.0,
            jump_cooldown_ms: 300.0,
            jump_height: 0.3,
            jump_speed_boost: 1.5,
            god_mode: false,
        }
    }
}

/// Level flow timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Paused countdown before each level starts.
    pub countdown_ms: f32,
    /// Upper bound on the elapsed time fed into a single tick.
    pub max_frame_ms: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_ms: 5000.0,
            max_frame_ms: 250.0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.maze.validate()?;
        self.motion.validate()?;
        self.session.validate()
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "maze size {}x{} must be positive",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("speed", self.speed),
            ("cell_size", self.cell_size),
            ("max_step", self.max_step),
            ("jump_duration_ms", self.jump_duration_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("motion.{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("backward_speed_scale", self.backward_speed_scale),
            ("turn_rate", self.turn_rate),
            ("probe_margin", self.probe_margin),
            ("jump_cooldown_ms", self.jump_cooldown_ms),
            ("jump_height", self.jump_height),
            ("jump_speed_boost", self.jump_speed_boost),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("motion.{name} must not be negative, got {value}")));
            }
        }
        // The sliding rules only look one cell ahead.
        if self.max_step + self.probe_margin >= self.cell_size {
            return Err(ConfigError::Invalid(format!(
                "motion.max_step + motion.probe_margin ({}) must be below motion.cell_size ({})",
                self.max_step + self.probe_margin,
                self.cell_size
            )));
        }
        Ok(())
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.countdown_ms.is_finite() && self.countdown_ms >= 0.0) {
            return Err(ConfigError::Invalid("session.countdown_ms must not be negative".into()));
        }
        if !(self.max_frame_ms.is_finite() && self.max_frame_ms > 0.0) {
            return Err(ConfigError::Invalid("session.max_frame_ms must be positive".into()));
        }
        Ok(())
    }
}
