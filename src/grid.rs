use macroquad::prelude::Color;

use crate::tetromino::Tetromino;

pub const ROWS: usize = 26;
pub const COLS: usize = 11;

/// First row scanned for completed lines; row 0 stays reserved for spawning.
const FIRST_CLEARABLE_ROW: usize = 1;

pub type Cell = Option<Color>;

/// The settled blocks. Row 0 is the top of the play field.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            cells: [[None; COLS]; ROWS],
        }
    }

    /// The cell at `(row, col)`, or `None` outside the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Writes one cell. Returns false, leaving the board untouched, when
    /// `(row, col)` is outside it.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; COLS]> {
        self.cells.iter()
    }

    /// True if any cell of `piece` is off the sides, below the floor or on a
    /// filled cell. Cells above the top edge only collide with the side walls.
    pub fn collides(&self, piece: &Tetromino) -> bool {
        piece.cells().any(|(row, col)| {
            if col < 0 || col >= COLS as i32 {
                return true;
            }
            row >= 0 && (row >= ROWS as i32 || self.cells[row as usize][col as usize].is_some())
        })
    }

    /// Writes the piece into the grid. Returns false if part of it was still
    /// above the play field and could not be stored.
    pub fn lock(&mut self, piece: &Tetromino) -> bool {
        let color = piece.color();
        let mut fits = true;
        for (row, col) in piece.cells() {
            if row >= 0 && row < ROWS as i32 && col >= 0 && col < COLS as i32 {
                self.cells[row as usize][col as usize] = Some(color);
            } else {
                fits = false;
            }
        }
        fits
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_some())
    }

    /// Removes `row` by shifting everything above it down one step.
    pub fn drop_row(&mut self, row: usize) {
        for r in (1..=row).rev() {
            self.cells[r] = self.cells[r - 1];
        }
        self.cells[0] = [None; COLS];
    }

    /// Clears every completed row and returns how many went.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = FIRST_CLEARABLE_ROW;
        while row < ROWS {
            if self.is_row_full(row) {
                self.drop_row(row);
                cleared += 1;
                // the row above now sits here, check it again
            } else {
                row += 1;
            }
        }
        cleared
    }
}
