//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "diecast")]
#[command(about = "Normalize scraped die-cast wiki pages into a cross-referenced JSON catalog", long_about = None)]
pub(crate) struct Cli {
    /// Root of the entity graph (castings/, releases/, series/, brands/)
    #[arg(short, long, global = true)]
    pub data_root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug-level messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Transform raw pages and report what organize would write
    Transform {
        /// Directory of raw page JSON files
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Transform raw pages and merge them into the entity graph
    Organize {
        /// Directory of raw page JSON files
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Fold sub-series files into their main series
    Consolidate {
        /// YAML file mapping main series to sub-series (default: built-in table)
        #[arg(long)]
        hierarchies: Option<PathBuf>,
    },

    /// Move castings filed under the wrong brand
    FixBrands,

    /// Fold legacy per-year series files into the current layout
    Migrate,
}
