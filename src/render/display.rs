//! Hands a saved image to the platform viewer.

use std::{path::Path, process::Command};

use anyhow::{Context, Result};

/// Viewer command line for the current platform.
fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Opens `path` without waiting for the viewer to exit.
pub fn show(path: &Path) -> Result<()> {
    let mut command = viewer_command(path);
    command
        .spawn()
        .with_context(|| format!("failed to launch {:?}", command.get_program()))?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
