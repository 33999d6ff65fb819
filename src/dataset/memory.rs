//! Dataset held entirely in memory, for synthetic grids in tests.

use anyhow::Result;
use chrono::NaiveDate;
use ndarray::{Array2, Array3, Axis};

use super::{check_increasing, PrecipSource};
use crate::error::ClimatologyError;

#[derive(Debug, Clone)]
pub struct MemoryDataset {
    days: Vec<NaiveDate>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    values: Array3<f64>,
}

impl MemoryDataset {
    /// `values` is indexed (day, lat, lon).
    pub fn new(
        days: Vec<NaiveDate>,
        lat: Vec<f64>,
        lon: Vec<f64>,
        values: Array3<f64>,
    ) -> Result<Self, ClimatologyError> {
        let (nt, ny, nx) = values.dim();
        for (name, expected, got) in [
            ("day", days.len(), nt),
            ("lat", lat.len(), ny),
            ("lon", lon.len(), nx),
        ] {
            if expected != got {
                return Err(ClimatologyError::DimensionMismatch {
                    name: name.to_string(),
                    expected,
                    got,
                });
            }
        }
        check_increasing(&days)?;

        Ok(MemoryDataset {
            days,
            lat,
            lon,
            values,
        })
    }
}

impl PrecipSource for MemoryDataset {
    fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    fn lat(&self) -> &[f64] {
        &self.lat
    }

    fn lon(&self) -> &[f64] {
        &self.lon
    }

    fn read_day(&self, index: usize) -> Result<Array2<f64>> {
        if index >= self.days.len() {
            anyhow::bail!("day index {} out of range ({} days)", index, self.days.len());
        }
        Ok(self.values.index_axis(Axis(0), index).to_owned())
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use ndarray::array;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_read_day_slabs() {
        let values = array![[[1.0, 2.0]], [[3.0, 4.0]]];
        let dataset = MemoryDataset::new(
            vec![day(2000, 1, 1), day(2000, 1, 2)],
            vec![40.0],
            vec![-100.0, -99.0],
            values,
        )
        .unwrap();

        assert_eq!(dataset.shape(), (1, 2));
        assert_eq!(dataset.read_day(1).unwrap(), array![[3.0, 4.0]]);
        assert!(dataset.read_day(2).is_err());
    }

    #[test]
    fn should_reject_shape_mismatch() {
        let result = MemoryDataset::new(
            vec![day(2000, 1, 1)],
            vec![40.0, 41.0],
            vec![-100.0],
            Array3::zeros((1, 1, 1)),
        );

        assert!(matches!(
            result,
            Err(ClimatologyError::DimensionMismatch { ref name, expected: 2, got: 1 }) if name == "lat"
        ));
    }

    #[test]
    fn should_reject_unsorted_days() {
        let result = MemoryDataset::new(
            vec![day(2000, 1, 2), day(2000, 1, 1)],
            vec![40.0],
            vec![-100.0],
            Array3::zeros((2, 1, 1)),
        );

        assert!(matches!(result, Err(ClimatologyError::InvalidTime { .. })));
    }
}
