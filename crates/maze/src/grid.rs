use labyrinth_common::CellCoord;
use serde::Serialize;

/// Tag stored in every grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    Wall,
    Empty,
    Target,
}

impl Block {
    /// Whether a player may stand in this cell.
    pub fn is_open(self) -> bool {
        !matches!(self, Block::Wall)
    }
}

/// The maze: a `width` x `height` array of blocks indexed `[x][y]`.
///
/// Built only by the generator; read-only afterwards. Every query that
/// falls outside the grid answers as if the cell were a wall, so collision
/// code never has to bounds-check before asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    start: CellCoord,
    target: CellCoord,
    /// Column-major: `cells[x * height + y]`.
    cells: Vec<Block>,
}

impl Grid {
    /// A grid of walls. The start and target are fixed up by the generator.
    pub(crate) fn walled(width: usize, height: usize, start: CellCoord) -> Self {
        Self {
            width,
            height,
            start,
            target: start,
            cells: vec![Block::Wall; width * height],
        }
    }

    pub(crate) fn set(&mut self, cell: CellCoord, block: Block) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = block;
        }
    }

    pub(crate) fn set_target(&mut self, cell: CellCoord) {
        self.set(cell, Block::Target);
        self.target = cell;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell the player enters the level at.
    pub fn start(&self) -> CellCoord {
        self.start
    }

    /// The single `Target` cell.
    pub fn target(&self) -> CellCoord {
        self.target
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.x as usize * self.height + cell.y as usize)
    }

    /// Block at `cell`; `Wall` outside the grid.
    pub fn get(&self, cell: CellCoord) -> Block {
        self.index(cell).map_or(Block::Wall, |i| self.cells[i])
    }

    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.get(cell).is_open()
    }

    /// Iterate every cell with its block, column by column.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Block)> + '_ {
        self.cells.iter().enumerate().map(|(i, b)| {
            let x = (i / self.height) as i32;
            let y = (i % self.height) as i32;
            (CellCoord::new(x, y), *b)
        })
    }

    /// Number of non-wall cells.
    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|b| b.is_open()).count()
    }

    /// Open 4-adjacent neighbours of `cell`.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        cell.neighbors().into_iter().filter(|n| self.is_open(*n))
    }
}

/// ASCII picture: `#` wall, space open, `X` target. The top line is the
/// highest `y`, so `Up` points up on screen.
impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                let ch = match self.get(CellCoord::new(x, y)) {
                    Block::Wall => '#',
                    Block::Empty => ' ',
                    Block::Target => 'X',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
