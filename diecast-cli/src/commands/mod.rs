pub(crate) mod consolidate;
pub(crate) mod fix_brands;
pub(crate) mod migrate;
pub(crate) mod organize;
pub(crate) mod transform;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Bold section heading for a pass summary.
pub(crate) fn log_heading(title: &str) {
    crate::log_blank();
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
}

/// One right-aligned counter line of a summary.
pub(crate) fn log_stat(label: &str, value: u64) {
    log::info!("  {:<24}{:>8}", label, value);
}

/// A failure counter: red when anything failed, dimmed otherwise.
pub(crate) fn log_failures(label: &str, value: u64) {
    if value > 0 {
        log::info!(
            "  {:<24}{:>8}",
            label,
            value.if_supports_color(Stdout, |t| t.red()),
        );
    } else {
        log::info!(
            "  {:<24}{:>8}",
            label,
            value.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
