use std::path::PathBuf;

use anyhow::Result;

use crate::dataset::{NetcdfDataset, PrecipSource};

/// Prints a summary of each input file.
pub fn info(inputs: &[PathBuf]) -> Result<()> {
    for path in inputs {
        let dataset = NetcdfDataset::open(path)?;
        println!("{}", summary(&dataset));
    }

    Ok(())
}

fn summary(dataset: &NetcdfDataset) -> String {
    let days = dataset.days();
    let (rows, cols) = dataset.shape();
    let extent = dataset.extent();

    let period = match (days.first(), days.last()) {
        (Some(first), Some(last)) => format!("{} to {} ({} days)", first, last, days.len()),
        _ => "no days".to_string(),
    };

    format!(
        "{}\n  variable: {}\n  period:   {}\n  grid:     {} lat x {} lon\n  extent:   lon {:.3} to {:.3}, lat {:.3} to {:.3}",
        dataset.path().display(),
        dataset.variable(),
        period,
        rows,
        cols,
        extent.lon_min,
        extent.lon_max,
        extent.lat_min,
        extent.lat_max,
    )
}

// -- Tests -------------------------------------------------------------------
