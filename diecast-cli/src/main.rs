//! diecast CLI
//!
//! Command-line interface for turning scraped die-cast wiki pages into a
//! normalized JSON catalog and maintaining that catalog.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use diecast_catalog::Store;

use cli_types::{Cli, Commands};
pub(crate) use error::CliError;

pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logger(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        })
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings_file = settings::settings_path();
    let settings = settings::load_settings(&settings_file)?;
    log::debug!("Settings: {}", settings_file.display());

    let data_root = settings.data_root(cli.data_root);
    let store = Store::new(&data_root);
    log::info!("Data root: {}", data_root.display());

    match cli.command {
        Commands::Transform { input } => {
            let input_dir = settings.input_dir(input);
            log::info!("Input: {}", input_dir.display());
            commands::transform::run_transform(&input_dir)
        }
        Commands::Organize { input } => {
            let input_dir = settings.input_dir(input);
            log::info!("Input: {}", input_dir.display());
            commands::organize::run_organize(&store, &input_dir)
        }
        Commands::Consolidate { hierarchies } => {
            let hierarchies = settings.hierarchies(hierarchies);
            commands::consolidate::run_consolidate(&store, hierarchies.as_deref())
        }
        Commands::FixBrands => commands::fix_brands::run_fix_brands(&store),
        Commands::Migrate => commands::migrate::run_migrate(&store),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
