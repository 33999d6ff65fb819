//! Averages annual totals into a climatology.

use ndarray::Array2;

use super::annual::AnnualGrid;
use crate::error::ClimatologyError;

/// Mean annual total over the baseline years.
#[derive(Debug, Clone, PartialEq)]
pub struct Climatology {
    pub years: Vec<i32>,
    pub values: Array2<f64>,
}

/// Element-wise arithmetic mean of the annual grids, every year weighted
/// equally whatever its day count.
///
/// Grids are summed in the order given, so identical input gives
/// bit-identical output.
pub fn mean_of_years(annual: &[AnnualGrid]) -> Result<Climatology, ClimatologyError> {
    let first = annual.first().ok_or(ClimatologyError::InsufficientData)?;
    let mut sum = Array2::<f64>::zeros(first.values.raw_dim());

    for grid in annual {
        if grid.values.dim() != sum.dim() {
            return Err(ClimatologyError::GridMismatch {
                reason: format!(
                    "annual grid for {} has shape {:?}, expected {:?}",
                    grid.year,
                    grid.values.dim(),
                    sum.dim()
                ),
            });
        }
        sum += &grid.values;
    }

    let count = annual.len() as f64;
    sum.mapv_inplace(|total| total / count);

    Ok(Climatology {
        years: annual.iter().map(|grid| grid.year).collect(),
        values: sum,
    })
}

// -- Tests -------------------------------------------------------------------
