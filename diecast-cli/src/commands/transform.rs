use std::collections::BTreeSet;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use diecast_import::{LogProgress, transform_dir};

use crate::CliError;

use super::{log_failures, log_heading, log_stat};

/// Transform the input pages without touching the data root.
pub(crate) fn run_transform(input_dir: &Path) -> Result<(), CliError> {
    let (batches, stats) = transform_dir(input_dir, &LogProgress)?;

    for batch in &batches {
        log::debug!(
            "  {} -> {} ({} release(s), {} skipped, brand {})",
            batch.source,
            batch.casting.casting_id.if_supports_color(Stdout, |t| t.cyan()),
            batch.rows.len(),
            batch.skipped.len(),
            batch.casting.brand_id,
        );
    }

    let series: BTreeSet<_> = batches
        .iter()
        .flat_map(|b| b.rows.iter())
        .filter_map(|r| r.series.as_ref().map(|s| s.series_id.as_str()))
        .collect();
    let brands: BTreeSet<_> = batches
        .iter()
        .map(|b| b.casting.brand_id.as_str())
        .collect();

    log_heading("Transform Summary");
    log_stat("Input files read", stats.files_read);
    log_failures("Input files unreadable", stats.files_failed);
    log_stat("Pages", stats.pages);
    log_failures("Pages malformed", stats.pages_failed);
    log_stat("Releases", stats.rows_kept);
    log_failures("Rows skipped", stats.rows_skipped);
    log_stat("Series", series.len() as u64);
    log_stat("Brands", brands.len() as u64);

    Ok(())
}
