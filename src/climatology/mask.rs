//! Marks non-positive cells as excluded.
//!
//! Zero or negative precipitation is the dataset's no-data convention (ocean
//! and undefined cells), not a measured dry climate. The threshold is `<= 0`.

use ndarray::{Array2, Zip};

/// A grid with an explicit per-cell validity flag.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    values: Array2<f64>,
    valid: Array2<bool>,
}

impl MaskedGrid {
    /// Value at (row, col), or `None` when the cell is excluded or out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if self.is_valid(row, col) {
            self.values.get((row, col)).copied()
        } else {
            None
        }
    }

    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.valid.get((row, col)).copied().unwrap_or(false)
    }

    /// (rows, columns).
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Minimum and maximum over valid cells.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        Zip::from(&self.values)
            .and(&self.valid)
            .for_each(|&value, &valid| {
                if valid {
                    range = Some(match range {
                        Some((min, max)) => (min.min(value), max.max(value)),
                        None => (value, value),
                    });
                }
            });
        range
    }
}

/// Excludes every cell `<= 0`. NaN compares false and is excluded too.
pub fn mask_non_positive(grid: &Array2<f64>) -> MaskedGrid {
    MaskedGrid {
        values: grid.clone(),
        valid: grid.mapv(|value| value > 0.0),
    }
}

// -- Tests -------------------------------------------------------------------
