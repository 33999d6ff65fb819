//! NetCDF loader for gridMET-style daily precipitation files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ndarray::Array2;
use netcdf::AttributeValue;

use super::{check_increasing, time, PrecipSource};
use crate::{error::ClimatologyError, settings};

/// A single NetCDF file holding a (day, lat, lon) precipitation variable.
pub struct NetcdfDataset {
    file: netcdf::File,
    path: PathBuf,
    variable: String,
    days: Vec<NaiveDate>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    packing: Packing,
}

impl NetcdfDataset {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("file not found: {}", path.display());
        }
        let file = netcdf::open(path)
            .with_context(|| format!("failed to open NetCDF file {}", path.display()))?;

        let lat = read_1d_f64(&file, settings::LAT_ALIASES, path)?;
        let lon = read_1d_f64(&file, settings::LON_ALIASES, path)?;
        let days = read_days(&file, path)?;

        let variable = find_alias(&file, settings::PRECIP_ALIASES).ok_or_else(|| {
            ClimatologyError::MissingVariable {
                name: settings::PRECIP_ALIASES[0].to_string(),
                path: path.to_path_buf(),
            }
        })?;

        let packing = {
            let var = file
                .variable(&variable)
                .ok_or_else(|| ClimatologyError::MissingVariable {
                    name: variable.clone(),
                    path: path.to_path_buf(),
                })?;
            check_dimensions(&var, days.len(), lat.len(), lon.len())?;
            Packing::from_variable(&var)
        };

        Ok(NetcdfDataset {
            file,
            path: path.to_path_buf(),
            variable,
            days,
            lat,
            lon,
            packing,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl PrecipSource for NetcdfDataset {
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
        let (ny, nx) = self.shape();
        let var = self
            .file
            .variable(&self.variable)
            .ok_or_else(|| ClimatologyError::MissingVariable {
                name: self.variable.clone(),
                path: self.path.clone(),
            })?;

        let raw = var
            .get_values::<f64, _>((index..index + 1, 0..ny, 0..nx))
            .with_context(|| {
                format!(
                    "failed to read day {} of '{}' from {}",
                    index,
                    self.variable,
                    self.path.display()
                )
            })?;

        let values = raw.into_iter().map(|v| self.packing.unpack(v)).collect();
        Ok(Array2::from_shape_vec((ny, nx), values)?)
    }
}

/// CF packing and missing-value attributes of the data variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Packing {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    fn from_variable(var: &netcdf::Variable) -> Self {
        Packing {
            scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
            fill_value: get_f64_attr(var, "_FillValue"),
            missing_value: get_f64_attr(var, "missing_value"),
        }
    }

    /// Maps a stored value to its physical value, or NaN when missing.
    pub fn unpack(&self, raw: f64) -> f64 {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return f64::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }
}

fn find_alias(file: &netcdf::File, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find(|alias| file.variable(alias).is_some())
        .map(|alias| alias.to_string())
}

/// Reads a 1-D variable, trying each alias in order.
fn read_1d_f64(file: &netcdf::File, aliases: &[&str], path: &Path) -> Result<Vec<f64>> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return var
                .get_values::<f64, _>(..)
                .with_context(|| format!("failed to read '{}' from {}", alias, path.display()));
        }
    }

    Err(ClimatologyError::MissingVariable {
        name: aliases.first().copied().unwrap_or("unknown").to_string(),
        path: path.to_path_buf(),
    }
    .into())
}

fn read_days(file: &netcdf::File, path: &Path) -> Result<Vec<NaiveDate>> {
    let name = find_alias(file, settings::DAY_ALIASES).ok_or_else(|| {
        ClimatologyError::MissingVariable {
            name: settings::DAY_ALIASES[0].to_string(),
            path: path.to_path_buf(),
        }
    })?;
    let var = file
        .variable(&name)
        .ok_or_else(|| ClimatologyError::MissingVariable {
            name: name.clone(),
            path: path.to_path_buf(),
        })?;

    let units = get_string_attr(&var, "units").ok_or_else(|| ClimatologyError::InvalidTime {
        reason: format!("time variable '{name}' has no 'units' attribute"),
    })?;
    let units = time::TimeUnits::parse(&units)?;

    if let Some(calendar) = get_string_attr(&var, "calendar") {
        time::check_calendar(&calendar)?;
    }

    let offsets = var
        .get_values::<f64, _>(..)
        .with_context(|| format!("failed to read '{}' from {}", name, path.display()))?;
    let days = offsets
        .iter()
        .map(|&offset| units.decode(offset))
        .collect::<Result<Vec<_>, _>>()?;

    check_increasing(&days)?;

    Ok(days)
}

fn check_dimensions(
    var: &netcdf::Variable,
    days: usize,
    lat: usize,
    lon: usize,
) -> Result<(), ClimatologyError> {
    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(ClimatologyError::DimensionMismatch {
            name: format!("{} dimensions", var.name()),
            expected: 3,
            got: dims.len(),
        });
    }

    let aliases = [
        settings::DAY_ALIASES,
        settings::LAT_ALIASES,
        settings::LON_ALIASES,
    ];
    let names: Vec<String> = dims.iter().map(|dim| dim.name()).collect();
    let in_order = names
        .iter()
        .zip(aliases)
        .all(|(name, aliases)| aliases.contains(&name.as_str()));
    if !in_order {
        return Err(ClimatologyError::DimensionOrder {
            variable: var.name(),
            expected: "day, lat, lon".to_string(),
            got: names.join(", "),
        });
    }

    for (dim, expected) in dims.iter().zip([days, lat, lon]) {
        if dim.len() != expected {
            return Err(ClimatologyError::DimensionMismatch {
                name: dim.name(),
                expected,
                got: dim.len(),
            });
        }
    }

    Ok(())
}

/// Checks the attribute exists before reading it, which keeps the HDF5
/// layer from printing errors for absent optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

// -- Tests -------------------------------------------------------------------
