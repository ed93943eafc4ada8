use std::path::Path;

use diecast_catalog::Store;
use diecast_import::{LogProgress, consolidate_hierarchies, resolve_hierarchies};

use crate::CliError;

use super::{log_failures, log_heading, log_stat};

pub(crate) fn run_consolidate(store: &Store, hierarchies: Option<&Path>) -> Result<(), CliError> {
    match hierarchies {
        Some(path) => log::info!("Hierarchies: {}", path.display()),
        None => log::info!("Hierarchies: built-in"),
    }
    let map = resolve_hierarchies(hierarchies)?;
    let stats = consolidate_hierarchies(store, &map, &LogProgress)?;

    log_heading("Consolidate Summary");
    log_stat("Main series written", stats.mains_written);
    log_stat("Sub-series folded", stats.subs_folded);
    log_stat("Skipped (already exist)", stats.mains_skipped);
    log_stat("Without sub-series", stats.mains_empty);
    log_failures("Unreadable sub-series", stats.subs_failed);
    log_failures("Write failures", stats.write_failures);

    Ok(())
}
