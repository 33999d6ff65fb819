//! Temporal selection, annual aggregation, multi-year averaging and masking.

pub mod annual;
pub mod mask;
pub mod reduce;
pub mod selection;

use anyhow::Result;
use indicatif::ProgressBar;

pub use annual::{annual_totals, AnnualGrid};
pub use mask::{mask_non_positive, MaskedGrid};
pub use reduce::{mean_of_years, Climatology};
pub use selection::{select_days, DateRange};

use crate::dataset::PrecipSource;

/// Runs selection, aggregation and reduction over `range`.
///
/// A range that overlaps no days fails with
/// [`ClimatologyError::InsufficientData`](crate::error::ClimatologyError).
pub fn compute<S: PrecipSource + ?Sized>(
    source: &S,
    range: &DateRange,
    progress: &ProgressBar,
) -> Result<Climatology> {
    let selection = select_days(source.days(), range);
    progress.set_length(selection.len() as u64);

    let annual = annual_totals(source, selection, progress)?;
    for grid in annual.iter().filter(|grid| grid.is_partial()) {
        progress.println(format!(
            "Note: {} is a partial year ({} days), averaged as is",
            grid.year, grid.days
        ));
    }

    Ok(mean_of_years(&annual)?)
}

// -- Tests -------------------------------------------------------------------
