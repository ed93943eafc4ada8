use std::path::Path;

use diecast_catalog::Store;
use diecast_import::{LogProgress, organize};

use crate::CliError;

use super::{log_failures, log_heading, log_stat};

/// Transform the input pages and merge them into the data root.
pub(crate) fn run_organize(store: &Store, input_dir: &Path) -> Result<(), CliError> {
    let stats = organize(store, input_dir, &LogProgress)?;

    log_heading("Organize Summary");
    log_stat("Pages", stats.pages);
    log_failures("Pages malformed", stats.transform.pages_failed);
    log_failures("Rows skipped", stats.transform.rows_skipped);
    log_failures("Input files unreadable", stats.transform.files_failed);
    log_stat("Releases written", stats.releases_written);
    log_stat("  versioned (-vN)", stats.releases_versioned);
    log_stat("Castings written", stats.castings_written);
    log_stat("Series written", stats.series_written);
    log_stat("Brands written", stats.brands_written);
    log_stat("Brand moves", stats.brand_moves);
    log_failures("Write failures", stats.write_failures);

    Ok(())
}
