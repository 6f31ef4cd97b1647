//! Core CLI definitions

use clap::{ArgAction, Parser, Subcommand};
use pdump::RegionType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "pdump")]
#[command(about = "Summarize and diff process memory maps", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (defaults to the user config directory)
    #[arg(long, env = "PDUMP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one dump: regions by size, then counts and sizes per type
    #[command(visible_alias = "s")]
    Summary {
        /// Path to maps dump
        input: PathBuf,

        /// Output format (uses configured default if not provided)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Skip the per-region listing
        #[arg(long)]
        no_listing: bool,
    },

    /// Diff two dumps: address ranges removed and added, in total and per type
    #[command(visible_alias = "d")]
    Diff {
        /// Earlier maps dump
        earlier: PathBuf,

        /// Later maps dump
        later: PathBuf,

        /// Output format (uses configured default if not provided)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Only report one region type (normal, stack, heap, mapped_file, vdso)
        #[arg(short = 't', long = "type")]
        region_type: Option<RegionType>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Skip malformed dump lines instead of failing
        #[arg(long)]
        skip_malformed: Option<bool>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
