//! Pass progress reporting.

use std::fmt;

/// What a pass did with one item (input file, page, series, brand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Everything the item needed was written.
    Done,
    /// Nothing to do for this item, or it was left as found on purpose.
    Skipped,
    /// Some or all of the item's writes failed, or its input was unreadable.
    Failed,
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        })
    }
}

/// Receives progress updates from a batch pass.
pub trait ImportProgress {
    /// Called once per item, after it has been handled.
    fn on_item(&self, current: usize, total: usize, name: &str, outcome: ItemOutcome);

    /// Called when a phase starts (e.g., "Organizing 12 page(s) into data").
    fn on_phase(&self, message: &str);

    /// Called when the pass is complete.
    fn on_complete(&self, message: &str);
}

/// Discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_item(&self, _current: usize, _total: usize, _name: &str, _outcome: ItemOutcome) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Logs through the `log` crate. Finished items are logged at debug level.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_item(&self, current: usize, total: usize, name: &str, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Done => log::debug!("  [{}/{}] {}", current, total, name),
            ItemOutcome::Skipped => log::info!("  [{}/{}] {} ({})", current, total, name, outcome),
            ItemOutcome::Failed => log::warn!("  [{}/{}] {} ({})", current, total, name, outcome),
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
