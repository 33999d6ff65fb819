//! Sums daily grids into calendar-year totals.

use std::ops::Range;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use indicatif::ProgressBar;
use ndarray::{Array2, Zip};

use crate::{dataset::PrecipSource, error::ClimatologyError};

/// Element-wise precipitation total of one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualGrid {
    pub year: i32,
    /// Number of days that contributed. Partial years are not normalised.
    pub days: usize,
    pub values: Array2<f64>,
}

impl AnnualGrid {
    fn empty(year: i32, shape: (usize, usize)) -> Self {
        AnnualGrid {
            year,
            days: 0,
            values: Array2::zeros(shape),
        }
    }

    /// True when fewer days contributed than the calendar year has.
    pub fn is_partial(&self) -> bool {
        let full = NaiveDate::from_ymd_opt(self.year, 12, 31).map_or(365, |d| d.ordinal() as usize);
        self.days < full
    }

    /// Adds one day. Missing (NaN) cells add nothing.
    fn accumulate(&mut self, day: &Array2<f64>) -> Result<(), ClimatologyError> {
        if day.dim() != self.values.dim() {
            return Err(ClimatologyError::GridMismatch {
                reason: format!(
                    "day grid {:?} does not match annual grid {:?}",
                    day.dim(),
                    self.values.dim()
                ),
            });
        }

        Zip::from(&mut self.values).and(day).for_each(|total, &value| {
            if !value.is_nan() {
                *total += value;
            }
        });
        self.days += 1;

        Ok(())
    }
}

/// Partitions the selected days by calendar year and sums each year.
///
/// Returns one grid per distinct year, in ascending order. Days are read one
/// at a time; `progress` advances once per day.
pub fn annual_totals<S: PrecipSource + ?Sized>(
    source: &S,
    selection: Range<usize>,
    progress: &ProgressBar,
) -> Result<Vec<AnnualGrid>> {
    let shape = source.shape();
    let days = &source.days()[selection.clone()];
    let mut totals: Vec<AnnualGrid> = Vec::new();

    for (index, day) in selection.zip(days) {
        let year = day.year();
        let grid = source.read_day(index)?;

        // Days are strictly increasing, so each year is one contiguous run.
        if totals.last().map(|t| t.year) != Some(year) {
            totals.push(AnnualGrid::empty(year, shape));
        }
        if let Some(current) = totals.last_mut() {
            current.accumulate(&grid)?;
        }

        progress.inc(1);
    }

    Ok(totals)
}

// -- Tests -------------------------------------------------------------------
