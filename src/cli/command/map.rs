use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    cli::{create_progress_bar, create_spinner},
    climatology::{self, mask_non_positive, DateRange},
    dataset,
    render::{self, display, overlay, overlay::Overlays},
};

/// Computes the baseline climatology of `inputs` and saves it as a map at
/// `output`. Returns the path written.
pub fn map(
    inputs: &[PathBuf],
    output: &Path,
    features_dir: Option<&Path>,
    show: bool,
) -> Result<String> {
    let range = DateRange::baseline()?;

    let bar = create_spinner("Opening precipitation data...".to_string());
    let source = dataset::open(inputs)?;
    bar.finish_with_message(format!("Opened {} days of data", source.days().len()));

    let bar = create_progress_bar(0, "Summing daily precipitation".to_string());
    let climatology = climatology::compute(&*source, &range, &bar)?;
    bar.finish_with_message(format!("Averaged {} years", climatology.years.len()));

    let masked = mask_non_positive(&climatology.values);
    let (rows, cols) = masked.dim();
    match masked.range() {
        Some((min, max)) => println!(
            "{} of {} cells with data, {:.0} to {:.0} mm",
            masked.valid_count(),
            rows * cols,
            min,
            max
        ),
        None => println!("No cells with data in {} x {} grid", rows, cols),
    }
    let extent = source.extent();

    let overlays = match resolve_features_dir(features_dir) {
        Some(dir) => Overlays::load(&dir, &extent)?,
        None => {
            eprintln!("Warning: no data directory found, drawing without map features");
            Overlays::default()
        }
    };

    let bar = create_spinner("Drawing map...".to_string());
    let figure = render::draw_climatology(
        extent,
        source.lat(),
        source.lon(),
        &masked,
        &overlays,
        &map_title(&range),
    )?;
    figure.save(output)?;
    bar.finish_with_message("Map drawn");

    if show {
        display::show(output)?;
    }

    Ok(output.to_string_lossy().to_string())
}

fn map_title(range: &DateRange) -> String {
    format!("Annual Precipitation Climatology ({})", range.label())
}

fn resolve_features_dir(features_dir: Option<&Path>) -> Option<PathBuf> {
    features_dir
        .map(Path::to_path_buf)
        .or_else(overlay::default_features_dir)
}

// -- Tests -------------------------------------------------------------------
