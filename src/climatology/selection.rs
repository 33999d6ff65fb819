//! Restricts the day axis to an inclusive date range.

use std::ops::Range;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{error::ClimatologyError, settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ClimatologyError> {
        if start > end {
            return Err(ClimatologyError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Parses `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .with_context(|| format!("invalid start date '{start}'"))?;
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
            .with_context(|| format!("invalid end date '{end}'"))?;

        Ok(DateRange::new(start, end)?)
    }

    /// The fixed baseline period every map is computed over.
    pub fn baseline() -> Result<Self> {
        DateRange::parse(settings::START_DATE, settings::END_DATE)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Human readable form used in titles, e.g. `1990-12-01 to 2020-12-31`.
    pub fn label(&self) -> String {
        format!("{} to {}", self.start(), self.end())
    }
}

/// Returns the index range of `days` falling inside `range`.
///
/// `days` must be strictly increasing. No overlap gives an empty range.
pub fn select_days(days: &[NaiveDate], range: &DateRange) -> Range<usize> {
    let first = days.partition_point(|d| *d < range.start);
    let last = days.partition_point(|d| *d <= range.end);

    first..last.max(first)
}

// -- Tests -------------------------------------------------------------------
