//! CF-convention time coordinate decoding.
//!
//! Handles `"<unit> since YYYY-MM-DD[ HH:MM:SS]"` on the standard
//! (proleptic Gregorian) calendar, which is what gridMET and most daily
//! reanalysis products ship.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::ClimatologyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Days => 86_400.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Seconds => 1.0,
        }
    }
}

/// Parsed `units` attribute of a time variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: NaiveDateTime,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self, ClimatologyError> {
        let invalid = || ClimatologyError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        };

        let parts: Vec<&str> = units.trim().splitn(3, ' ').collect();
        if parts.len() < 3 || !parts[1].eq_ignore_ascii_case("since") {
            return Err(invalid());
        }

        let unit = match parts[0].to_lowercase().as_str() {
            "days" | "day" | "d" => TimeUnit::Days,
            "hours" | "hour" | "h" => TimeUnit::Hours,
            "minutes" | "minute" | "min" => TimeUnit::Minutes,
            "seconds" | "second" | "s" => TimeUnit::Seconds,
            _ => return Err(invalid()),
        };

        let epoch = parse_epoch(parts[2].trim()).ok_or_else(invalid)?;

        Ok(TimeUnits { unit, epoch })
    }

    /// Converts an offset into the calendar date it falls on.
    pub fn decode(&self, offset: f64) -> Result<NaiveDate, ClimatologyError> {
        if !offset.is_finite() {
            return Err(ClimatologyError::InvalidTime {
                reason: format!("non-finite time offset {offset}"),
            });
        }

        let seconds = (offset * self.unit.seconds()).floor() as i64;
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| self.epoch.checked_add_signed(delta))
            .map(|datetime| datetime.date())
            .ok_or_else(|| ClimatologyError::InvalidTime {
                reason: format!("time offset {offset} overflows from {}", self.epoch),
            })
    }
}

/// Calendars whose day arithmetic matches chrono's.
pub fn check_calendar(calendar: &str) -> Result<(), ClimatologyError> {
    match calendar.to_lowercase().as_str() {
        "standard" | "gregorian" | "proleptic_gregorian" => Ok(()),
        other => Err(ClimatologyError::InvalidTime {
            reason: format!("unsupported calendar '{other}'"),
        }),
    }
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    // Drop a trailing zone designator such as "UTC" or "Z".
    let s = s.trim_end_matches('Z').trim_end_matches(" UTC").trim();

    let (date, time) = match s.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (s, None),
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = match time {
        Some(t) if !t.is_empty() => NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            .ok()?,
        _ => NaiveTime::MIN,
    };

    Some(date.and_time(time))
}

// -- Tests -------------------------------------------------------------------
