use std::collections::VecDeque;

use labyrinth_common::CellCoord;

use crate::grid::Grid;

impl Grid {
    /// Shortest 4-adjacent path through open cells, `from` and `to`
    /// inclusive. In a perfect maze this is the only path.
    ///
    /// Breadth-first with came-from data in a `Vec` indexed like the grid,
    /// so the result is deterministic. `None` when either end is a wall or
    /// the two are disconnected.
    pub fn solve(&self, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
        if !self.is_open(from) || !self.is_open(to) {
            return None;
        }
        let height = self.height();
        let idx = |c: CellCoord| c.x as usize * height + c.y as usize;

        let mut came_from: Vec<Option<CellCoord>> = vec![None; self.width() * height];
        let mut queue = VecDeque::from([from]);
        came_from[idx(from)] = Some(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            for next in self.open_neighbors(current) {
                if came_from[idx(next)].is_none() {
                    came_from[idx(next)] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        came_from[idx(to)]?;
        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            cursor = came_from[idx(cursor)]?;
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }
}
