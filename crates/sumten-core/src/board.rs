//! Game board: a fixed grid of valued cells.
//!
//! - Values are drawn uniformly from `1..=9` at generation time and never
//!   change afterwards.
//! - `cleared` only ever goes from `false` to `true` within one round.
//! - Storage is a flat row-major `Vec<Cell>`; [`Board::rows`] exposes the
//!   row-of-rows view used on the wire.

use rand::Rng;

/// Default grid height (landscape layout).
pub const ROWS: usize = 10;

/// Default grid width (landscape layout).
pub const COLS: usize = 17;

/// Smallest value a cell can hold.
pub const MIN_VALUE: u8 = 1;

/// Largest value a cell can hold.
pub const MAX_VALUE: u8 = 9;

/// A single grid cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    pub value: u8,
    pub cleared: bool,
}

impl Cell {
    pub fn new(value: u8) -> Self {
        Cell {
            value,
            cleared: false,
        }
    }
}

/// Zero-based `(row, col)` coordinate of a cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }
}

/// A `rows x cols` grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Generate a fresh board with every value drawn independently from
    /// `MIN_VALUE..=MAX_VALUE` and nothing cleared.
    pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let cells = (0..rows * cols)
            .map(|_| Cell::new(rng.random_range(MIN_VALUE..=MAX_VALUE)))
            .collect();

        Board { rows, cols, cells }
    }

    /// Build a board from explicit row values. Returns `None` if the rows are
    /// ragged, empty, or contain a value outside `1..=9`.
    pub fn from_values(values: &[Vec<u8>]) -> Option<Self> {
        let rows = values.len();
        let cols = values.first()?.len();
        if cols == 0 || values.iter().any(|r| r.len() != cols) {
            return None;
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for &value in values.iter().flatten() {
            if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
                return None;
            }
            cells.push(Cell::new(value));
        }

        Some(Board { rows, cols, cells })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells (`rows * cols`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn get(&self, pos: CellPos) -> Option<&Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get(pos.row * self.cols + pos.col)
    }

    pub fn get_mut(&mut self, pos: CellPos) -> Option<&mut Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get_mut(pos.row * self.cols + pos.col)
    }

    /// Row-major view: one slice per row.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1))
    }

    /// Number of cells cleared so far.
    pub fn cleared_count(&self) -> usize {
        self.cells.iter().filter(|c| c.cleared).count()
    }
}
