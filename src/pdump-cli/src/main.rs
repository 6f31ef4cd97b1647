mod cli;
mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use config::Config;

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = Config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Configure {
            format,
            skip_malformed,
            show,
        } => {
            commands::configure::handle(&config_path, format, skip_malformed, show)?;
        }

        Commands::Summary {
            input,
            format,
            no_listing,
        } => {
            let config = Config::load(&config_path)?;
            commands::summary::handle(
                &input,
                config.format_or(format),
                !no_listing,
                config.load_options(),
            )?;
        }

        Commands::Diff {
            earlier,
            later,
            format,
            region_type,
        } => {
            let config = Config::load(&config_path)?;
            commands::diff::handle(
                &earlier,
                &later,
                config.format_or(format),
                region_type,
                config.load_options(),
            )?;
        }
    }

    Ok(())
}
