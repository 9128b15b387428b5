use crate::shapes::{BlockColor, Shape};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(BlockColor),
}

impl CellState {
    pub fn is_empty(&self) -> bool {
        *self == CellState::Empty
    }
}

/// Locked cells of the playfield. Row 0 is the top.
///
/// Always `GRID_HEIGHT` rows of `GRID_WIDTH` cells: a cleared row is replaced
/// by an empty row at the top.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: vec![vec![CellState::Empty; GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<CellState> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Writes a cell; coordinates outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: CellState) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Whether `shape` with its top-left corner at `(x, y)` fits.
    ///
    /// Sides and bottom are hard walls. There is no top wall: cells above row 0
    /// are accepted and never compared against the grid, which is what lets a
    /// piece spawn or rotate while partly above the field.
    pub fn is_valid_placement(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape.cells().all(|(dx, dy)| {
            let cx = x + dx;
            let cy = y + dy;
            if cx < 0 || cx >= GRID_WIDTH as i16 || cy >= GRID_HEIGHT as i16 {
                return false;
            }
            cy < 0 || self.rows[cy as usize][cx as usize].is_empty()
        })
    }

    /// Locks the occupied cells of `shape` into the grid with `color`.
    /// Cells above the top row are dropped.
    pub fn merge(&mut self, shape: &Shape, x: i16, y: i16, color: BlockColor) {
        for (dx, dy) in shape.cells() {
            let cx = x + dx;
            let cy = y + dy;
            if cy >= 0 && cx >= 0 {
                self.set(cx as usize, cy as usize, CellState::Filled(color));
            }
        }
    }

    /// Removes every full row, bottom to top, and returns how many went.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.rows.len();

        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.rows.remove(y - 1);
                self.rows.insert(0, vec![CellState::Empty; GRID_WIDTH]);
                cleared += 1;
                // Same index again: the row above has shifted into it.
            } else {
                y -= 1;
            }
        }

        cleared
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| !cell.is_empty())
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows[y].iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
