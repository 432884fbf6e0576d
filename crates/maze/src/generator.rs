use labyrinth_common::{CellCoord, Direction};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::grid::{Block, Grid};

/// Errors from maze generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("invalid maze dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },
}

/// Generate a maze with a thread-local random source.
pub fn generate(width: usize, height: usize) -> Result<Grid, MazeError> {
    generate_with(width, height, &mut rand::thread_rng())
}

/// Generate a maze reproducibly from `seed`.
pub fn generate_seeded(width: usize, height: usize, seed: u64) -> Result<Grid, MazeError> {
    generate_with(width, height, &mut StdRng::seed_from_u64(seed))
}

/// Carve a perfect maze by randomized depth-first backtracking.
///
/// Only odd `(x, y)` cells are ever visited; the even cell between two
/// visited cells is opened when the carve passes through it. The walk starts
/// at `(1, 1)` and the target is placed at `(width - 2, height - 2)`, snapped
/// down to an odd coordinate when a dimension is even so it always lands on
/// a carved cell.
///
/// The result depends only on the sequence drawn from `rng`.
pub fn generate_with<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    if width == 0 || height == 0 {
        return Err(MazeError::InvalidDimensions { width, height });
    }
    if width < 5 || height < 5 || width % 2 == 0 || height % 2 == 0 {
        tracing::warn!(width, height, "maze dimensions should be odd and at least 5");
    }

    let _span = tracing::debug_span!("maze_generate", width, height).entered();

    let start = CellCoord::new(
        1.min(width as i32 - 1),
        1.min(height as i32 - 1),
    );
    let mut grid = Grid::walled(width, height, start);
    let mut visited = vec![false; width * height];
    let idx = |c: CellCoord| c.x as usize * height + c.y as usize;

    let mut backtrack: Vec<CellCoord> = vec![start];
    visited[idx(start)] = true;
    grid.set(start, Block::Empty);

    let mut directions = Direction::ALL;
    while let Some(&current) = backtrack.last() {
        directions.shuffle(rng);
        let next = directions.iter().copied().find_map(|dir| {
            let two_away = current.step(dir, 2);
            (grid.contains(two_away) && !visited[idx(two_away)]).then_some((dir, two_away))
        });

        match next {
            Some((dir, two_away)) => {
                grid.set(current.step(dir, 1), Block::Empty);
                grid.set(two_away, Block::Empty);
                visited[idx(two_away)] = true;
                backtrack.push(two_away);
            }
            // Dead end.
            None => {
                backtrack.pop();
            }
        }
    }

    let target = CellCoord::new(target_coord(width, start.x), target_coord(height, start.y));
    grid.set_target(target);

    tracing::debug!(open = grid.open_cells(), goal = %target, "maze carved");
    Ok(grid)
}

/// `len - 2`, moved onto an odd (carved) coordinate and never before the start.
fn target_coord(len: usize, start: i32) -> i32 {
    let t = len.saturating_sub(2) as i32;
    let t = if t % 2 == 0 { t - 1 } else { t };
    t.max(start)
}
