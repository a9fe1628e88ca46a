//! Console Grid
//!
//! A 2D grid of cells backing a virtual terminal.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// A row-major 2D array of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// The cells, `cols * rows` long
    cells: Vec<Cell>,
    /// Number of columns
    cols: usize,
    /// Number of rows
    rows: usize,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![Cell::default(); cols * rows],
            cols,
            rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        if col < self.cols && row < self.rows {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Get a reference to a cell
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        let idx = self.index(col, row)?;
        Some(&self.cells[idx])
    }

    /// Get a mutable reference to a cell
    pub fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        let idx = self.index(col, row)?;
        Some(&mut self.cells[idx])
    }

    /// Set a cell, ignoring out-of-range positions
    pub fn set(&mut self, col: usize, row: usize, cell: Cell) -> bool {
        match self.cell_mut(col, row) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Iterate over the cells of one row
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.cells[start..start + self.cols])
        } else {
            None
        }
    }

    /// Resize the grid, keeping the overlapping top-left content
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols == self.cols && rows == self.rows {
            return;
        }

        let mut cells = vec![Cell::default(); cols * rows];
        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                cells[row * cols + col] = self.cells[row * self.cols + col];
            }
        }

        self.cells = cells;
        self.cols = cols;
        self.rows = rows;
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Fill a rectangular region with a cell, clipped to the grid
    pub fn fill(&mut self, col: usize, row: usize, width: usize, height: usize, cell: Cell) {
        let end_col = col.saturating_add(width).min(self.cols);
        let end_row = row.saturating_add(height).min(self.rows);
        for r in row..end_row {
            for c in col..end_col {
                self.cells[r * self.cols + c] = cell;
            }
        }
    }

    /// Iterate over all cells with their positions
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % cols, i / cols, cell))
    }
}
