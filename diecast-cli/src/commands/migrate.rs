use diecast_catalog::Store;
use diecast_import::{LogProgress, migrate_legacy_layout};

use crate::CliError;

use super::{log_failures, log_heading, log_stat};

pub(crate) fn run_migrate(store: &Store) -> Result<(), CliError> {
    let stats = migrate_legacy_layout(store, &LogProgress)?;

    if stats.legacy_files == 0 {
        log::info!("No legacy per-year series files found.");
        return Ok(());
    }

    log_heading("Migrate Summary");
    log_stat("Legacy files", stats.legacy_files);
    log_failures("Legacy files unreadable", stats.legacy_unreadable);
    log_stat("Series written", stats.series_written);
    log_stat("Legacy files removed", stats.files_removed);
    log_stat("Year dirs removed", stats.dirs_removed);
    log_failures("Write failures", stats.write_failures);

    Ok(())
}
