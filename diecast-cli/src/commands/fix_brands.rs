use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use diecast_catalog::Store;
use diecast_import::{LogProgress, reassign_brands};

use crate::CliError;

use super::{log_failures, log_heading, log_stat};

pub(crate) fn run_fix_brands(store: &Store) -> Result<(), CliError> {
    let stats = reassign_brands(store, &LogProgress)?;

    if !stats.moves.is_empty() {
        log_heading("Moved Castings");
        for moved in &stats.moves {
            log::info!(
                "  {} {} {} {}",
                moved.casting_ref,
                moved.from.if_supports_color(Stdout, |t| t.dimmed()),
                "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
                moved.to.if_supports_color(Stdout, |t| t.green()),
            );
        }
    }

    log_heading("Fix Brands Summary");
    log_stat("Brands scanned", stats.brands_scanned);
    log_failures("Brands unreadable", stats.brands_unreadable);
    log_stat("Castings checked", stats.castings_checked);
    log_stat("Castings moved", stats.moves.len() as u64);
    log_stat("Brands created", stats.brands_created);
    log_stat("Castings updated", stats.castings_updated);
    log_failures("Write failures", stats.write_failures);

    Ok(())
}
