//! Several sources concatenated along the day axis.
//!
//! gridMET distributes one file per year; stacking them gives the same view
//! as a single multi-decade file.

use anyhow::Result;
use chrono::NaiveDate;
use ndarray::Array2;

use super::PrecipSource;
use crate::error::ClimatologyError;

pub struct StackedDataset {
    parts: Vec<Box<dyn PrecipSource>>,
    /// Index of the first day of each part in the stacked day axis.
    offsets: Vec<usize>,
    days: Vec<NaiveDate>,
    lat: Vec<f64>,
    lon: Vec<f64>,
}

impl StackedDataset {
    /// Parts are ordered by their first day, so file order on the command
    /// line does not matter. Every part must share the first part's grid and
    /// days must keep increasing across part boundaries.
    pub fn new(mut parts: Vec<Box<dyn PrecipSource>>) -> Result<Self> {
        parts.retain(|part| !part.days().is_empty());
        parts.sort_by_key(|part| part.days()[0]);

        // Nothing to average, same as a single empty file.
        let first = parts.first().ok_or(ClimatologyError::InsufficientData)?;
        let lat = first.lat().to_vec();
        let lon = first.lon().to_vec();

        let mut days: Vec<NaiveDate> = Vec::new();
        let mut offsets = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            if part.lat() != lat.as_slice() || part.lon() != lon.as_slice() {
                return Err(ClimatologyError::GridMismatch {
                    reason: format!("source {} does not share the grid of source 0", index),
                }
                .into());
            }

            if let (Some(last), Some(next)) = (days.last(), part.days().first()) {
                if next <= last {
                    return Err(ClimatologyError::InvalidTime {
                        reason: format!("sources overlap: {} follows {}", next, last),
                    }
                    .into());
                }
            }

            offsets.push(days.len());
            days.extend_from_slice(part.days());
        }

        Ok(StackedDataset {
            parts,
            offsets,
            days,
            lat,
            lon,
        })
    }
}

impl PrecipSource for StackedDataset {
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
        let part = self.offsets.partition_point(|&offset| offset <= index) - 1;

        self.parts[part].read_day(index - self.offsets[part])
    }
}

// -- Tests -------------------------------------------------------------------
