//! Gridded daily precipitation sources.
//!
//! A source exposes a strictly increasing day coordinate, a fixed
//! latitude/longitude grid, and reads one day at a time so that decades of
//! daily data never need to be resident at once.

#[cfg(test)]
pub mod memory;
pub mod netcdf_file;
pub mod stacked;
pub mod time;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use ndarray::Array2;

#[cfg(test)]
pub use memory::MemoryDataset;
pub use netcdf_file::NetcdfDataset;
pub use stacked::StackedDataset;

use crate::error::ClimatologyError;

pub trait PrecipSource {
    /// Day coordinate, strictly increasing.
    fn days(&self) -> &[NaiveDate];
    fn lat(&self) -> &[f64];
    fn lon(&self) -> &[f64];

    /// Reads the (lat, lon) grid for the day at `index`. Missing values are NaN.
    fn read_day(&self, index: usize) -> Result<Array2<f64>>;

    /// Grid shape as (rows, columns), i.e. (lat, lon).
    fn shape(&self) -> (usize, usize) {
        (self.lat().len(), self.lon().len())
    }

    fn extent(&self) -> Extent {
        Extent::from_coords(self.lat(), self.lon())
    }
}

/// Geographic bounding box of the grid cell centres, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    /// Builds the extent from coordinate vectors in any order. A single
    /// row or column gets half a degree either side so the box is never
    /// degenerate.
    pub fn from_coords(lat: &[f64], lon: &[f64]) -> Self {
        let (lat_min, lat_max) = padded_bounds(lat);
        let (lon_min, lon_max) = padded_bounds(lon);

        Extent {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Width over height; Plate Carrée keeps one degree square.
    pub fn aspect(&self) -> f64 {
        self.width() / self.height()
    }
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    if !min.is_finite() {
        return (-0.5, 0.5);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }

    (min, max)
}

/// Opens one or more NetCDF files as a single source. Several files are
/// stacked along the day axis.
pub fn open(paths: &[PathBuf]) -> Result<Box<dyn PrecipSource>> {
    match paths {
        [] => Err(anyhow!("no input files given")),
        [path] => Ok(Box::new(NetcdfDataset::open(path)?)),
        _ => {
            let parts = paths
                .iter()
                .map(|path| {
                    NetcdfDataset::open(path).map(|d| Box::new(d) as Box<dyn PrecipSource>)
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Box::new(StackedDataset::new(parts)?))
        }
    }
}

/// Checks the day coordinate is strictly increasing.
pub(crate) fn check_increasing(days: &[NaiveDate]) -> Result<(), ClimatologyError> {
    match days.windows(2).find(|pair| pair[0] >= pair[1]) {
        Some(pair) => Err(ClimatologyError::InvalidTime {
            reason: format!(
                "day coordinate is not strictly increasing ({} then {})",
                pair[0], pair[1]
            ),
        }),
        None => Ok(()),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_compute_extent_from_descending_latitudes() {
        let lat = [49.4, 37.0, 25.1];
        let lon = [-124.7, -96.0, -67.0];
        let extent = Extent::from_coords(&lat, &lon);

        assert_eq!(extent.lat_min, 25.1);
        assert_eq!(extent.lat_max, 49.4);
        assert_eq!(extent.lon_min, -124.7);
        assert_eq!(extent.lon_max, -67.0);
    }

    #[test]
    fn should_pad_single_cell_extent() {
        let extent = Extent::from_coords(&[40.0], &[-100.0]);

        assert_eq!(extent.width(), 1.0);
        assert_eq!(extent.height(), 1.0);
        assert_eq!(extent.aspect(), 1.0);
        assert_eq!(extent.lon_min, -100.5);
        assert_eq!(extent.lat_max, 40.5);
    }

    #[test]
    fn should_reject_repeated_days() {
        let d = |day| NaiveDate::from_ymd_opt(2000, 1, day).unwrap();

        assert!(check_increasing(&[d(1), d(2), d(3)]).is_ok());
        assert!(check_increasing(&[d(1), d(2), d(2)]).is_err());
        assert!(check_increasing(&[d(2), d(1)]).is_err());
        assert!(check_increasing(&[]).is_ok());
    }

    #[test]
    fn should_refuse_to_open_nothing() {
        assert!(open(&[]).is_err());
    }
}
