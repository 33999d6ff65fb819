//! Fixed parameters of a climatology run.
//!
//! The baseline period and every visual parameter are literals here rather
//! than options; the command line only chooses files.

/// First day of the baseline period (inclusive).
pub const START_DATE: &str = "1990-12-01";

/// Last day of the baseline period (inclusive).
pub const END_DATE: &str = "2020-12-31";

/// Lower bound of the color scale, in mm.
pub const COLOR_MIN: f64 = 0.0;

/// Upper bound of the color scale, in mm.
pub const COLOR_MAX: f64 = 2000.0;

/// Spacing of the colorbar ticks, in mm.
pub const COLOR_TICK_STEP: f64 = 250.0;

pub const DPI: u32 = 300;

/// Figure size in inches (width, height).
pub const FIGURE_SIZE: (f64, f64) = (10.0, 6.0);

pub const OUTPUT_FILE: &str = "annual_climatology_precip_1991_2020.png";

pub const DATA_SOURCE: &str = "gridMET";

pub const COLORBAR_LABEL: &str = "Precipitation (mm)";

/// Ocean fill, matplotlib's `dodgerblue`.
pub const OCEAN_COLOR: (u8, u8, u8) = (0x1e, 0x90, 0xff);

/// Width of coastline, border and state lines, in points.
pub const LINE_WIDTH_PT: f64 = 0.5;

/// Names tried, in order, for the precipitation variable.
pub const PRECIP_ALIASES: &[&str] = &["precipitation_amount", "pr", "precip"];

pub const DAY_ALIASES: &[&str] = &["day", "time"];

pub const LAT_ALIASES: &[&str] = &["lat", "latitude"];

pub const LON_ALIASES: &[&str] = &["lon", "longitude"];

/// Directory under the user data dir holding the Natural Earth layers.
pub const FEATURES_SUBDIR: &str = "precip-climatology/natural_earth";

/// Converts a size in points to pixels at the figure resolution.
pub fn points_to_pixels(points: f64) -> f64 {
    points * DPI as f64 / 72.0
}

/// Canvas size in pixels.
pub fn canvas_size() -> (u32, u32) {
    (
        (FIGURE_SIZE.0 * DPI as f64).round() as u32,
        (FIGURE_SIZE.1 * DPI as f64).round() as u32,
    )
}

// -- Tests -------------------------------------------------------------------
