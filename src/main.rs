mod cli;
mod climatology;
mod dataset;
mod error;
mod render;
mod settings;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Map {
            inputs,
            output,
            features_dir,
            show,
        } => {
            let filename = command::map(inputs, output, features_dir.as_deref(), *show)?;
            println!("File saved to `{}`", filename);
        }
        Commands::Info { inputs } => command::info(inputs)?,
    }

    Ok(())
}
