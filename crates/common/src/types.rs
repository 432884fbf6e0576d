use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a level installed into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(pub Uuid);

impl LevelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LevelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A discrete maze cell. `x` indexes columns, `y` indexes rows; in world
/// space `x` maps to the X axis and `y` to the Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell `steps` cells away in `dir`.
    pub fn step(self, dir: Direction, steps: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx * steps, self.y + dy * steps)
    }

    /// Chebyshev (king-move) distance.
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Manhattan distance.
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The four 4-adjacent cells, in `Direction::ALL` order.
    pub fn neighbors(self) -> [Self; 4] {
        Direction::ALL.map(|d| self.step(d, 1))
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal grid direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Grid delta. `Up` increases `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Snapshot of the movement keys held during one tick.
///
/// Produced by the input layer, consumed by the motion resolver. The kernel
/// never sees raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputIntent {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub forward: bool,
    pub backward: bool,
    pub jump: bool,
}

impl InputIntent {
    pub const IDLE: InputIntent = InputIntent {
        rotate_left: false,
        rotate_right: false,
        forward: false,
        backward: false,
        jump: false,
    };

    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::IDLE
        }
    }

    pub fn backward() -> Self {
        Self {
            backward: true,
            ..Self::IDLE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::IDLE
        }
    }

    pub fn turn_left() -> Self {
        Self {
            rotate_left: true,
            ..Self::IDLE
        }
    }

    pub fn turn_right() -> Self {
        Self {
            rotate_right: true,
            ..Self::IDLE
        }
    }
}
