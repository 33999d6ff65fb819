//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{command, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::settings;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the annual precipitation climatology and save it as a map
    Map {
        /// gridMET daily precipitation NetCDF file(s), stacked along time
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Where to write the PNG
        #[arg(short, long, default_value = settings::OUTPUT_FILE)]
        output: PathBuf,

        /// Directory holding the Natural Earth GeoJSON layers
        #[arg(long)]
        features_dir: Option<PathBuf>,

        /// Open the saved map in the image viewer
        #[arg(long)]
        show: bool,
    },
    /// Summarise NetCDF input files
    Info {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_map_with_defaults() {
        let cli = Cli::try_parse_from(["precip-climatology", "map", "a.nc", "b.nc"]).unwrap();

        match cli.command {
            Commands::Map { inputs, output, features_dir, show } => {
                assert_eq!(inputs, vec![PathBuf::from("a.nc"), PathBuf::from("b.nc")]);
                assert_eq!(output, PathBuf::from(settings::OUTPUT_FILE));
                assert_eq!(features_dir, None);
                assert!(!show);
            }
            Commands::Info { .. } => panic!("expected map"),
        }
    }

    #[test]
    fn should_parse_map_options() {
        let cli = Cli::try_parse_from([
            "precip-climatology",
            "map",
            "pr.nc",
            "--output",
            "out.png",
            "--features-dir",
            "/tmp/ne",
            "--show",
        ])
        .unwrap();

        match cli.command {
            Commands::Map { output, features_dir, show, .. } => {
                assert_eq!(output, PathBuf::from("out.png"));
                assert_eq!(features_dir, Some(PathBuf::from("/tmp/ne")));
                assert!(show);
            }
            Commands::Info { .. } => panic!("expected map"),
        }
    }

    #[test]
    fn should_require_an_input() {
        assert!(Cli::try_parse_from(["precip-climatology", "map"]).is_err());
        assert!(Cli::try_parse_from(["precip-climatology", "info"]).is_err());
    }
}
