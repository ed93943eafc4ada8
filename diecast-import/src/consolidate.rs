//! Hierarchical consolidation: fold sub-series files into their main series.
//!
//! A main series whose file already exists when the pass starts is left
//! alone, even if some of its sub-series files reappeared since. Sub-series
//! files are deleted only once the main file has been written.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use diecast_catalog::store::{EntityKey, Store};
use diecast_catalog::types::{Series, SeriesReleases};
use diecast_catalog::{Hierarchy, HierarchyMap, default_hierarchies, load_hierarchies};

use crate::error::{ImportError, require_data_root};
use crate::progress::{ImportProgress, ItemOutcome};

/// Statistics from a consolidation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsolidateStats {
    pub mains_written: u64,
    /// Main series skipped because their file already existed.
    pub mains_skipped: u64,
    /// Main series with no sub-series file on disk.
    pub mains_empty: u64,
    pub subs_folded: u64,
    pub subs_failed: u64,
    pub write_failures: u64,
}

/// The hierarchy map from `path`, or the built-in one.
pub fn resolve_hierarchies(path: Option<&Path>) -> Result<HierarchyMap, ImportError> {
    Ok(match path {
        Some(path) => load_hierarchies(path)?,
        None => default_hierarchies()?,
    })
}

/// Run the consolidation pass over every main series in `hierarchies`.
pub fn consolidate_hierarchies(
    store: &Store,
    hierarchies: &HierarchyMap,
    progress: &dyn ImportProgress,
) -> Result<ConsolidateStats, ImportError> {
    require_data_root(store)?;
    let mut stats = ConsolidateStats::default();

    progress.on_phase(&format!(
        "Consolidating {} main series",
        hierarchies.len()
    ));

    for (i, (main_id, hierarchy)) in hierarchies.iter().enumerate() {
        let outcome = consolidate_one(store, main_id, hierarchy, &mut stats);
        progress.on_item(i + 1, hierarchies.len(), &hierarchy.name, outcome);
    }

    progress.on_complete(&format!(
        "Consolidated {} main series ({} sub-series folded), {} skipped as existing, {} without sub-series, {} unreadable sub-series, {} write failure(s)",
        stats.mains_written,
        stats.subs_folded,
        stats.mains_skipped,
        stats.mains_empty,
        stats.subs_failed,
        stats.write_failures,
    ));

    Ok(stats)
}

fn consolidate_one(
    store: &Store,
    main_id: &str,
    hierarchy: &Hierarchy,
    stats: &mut ConsolidateStats,
) -> ItemOutcome {
    let main_key = EntityKey::Series(main_id.to_string());
    if store.exists(&main_key) {
        log::info!(
            "  {} already consolidated, leaving it untouched",
            main_id
        );
        stats.mains_skipped += 1;
        return ItemOutcome::Skipped;
    }

    let mut years: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    let mut total_releases = 0u32;
    let mut max_index = 0u32;
    let mut folded = Vec::new();

    for sub_id in &hierarchy.sub_series {
        if sub_id == main_id {
            continue;
        }
        let sub_key = EntityKey::Series(sub_id.clone());
        let sub: Series = match store.load(&sub_key) {
            Ok(Some(sub)) => sub,
            Ok(None) => continue,
            Err(e) => {
                log::error!("  Cannot fold {} into {}: {}", sub_id, main_id, e);
                stats.subs_failed += 1;
                continue;
            }
        };

        for (year, refs) in sub.releases.per_year() {
            years
                .entry(year)
                .or_default()
                .entry(sub_id.clone())
                .or_default()
                .extend(refs);
        }
        total_releases = total_releases.saturating_add(sub.total_releases);
        max_index = max_index.max(sub.max_index);
        folded.push(sub_key);
    }

    if folded.is_empty() {
        log::debug!("  {}: no sub-series files found", main_id);
        stats.mains_empty += 1;
        return ItemOutcome::Skipped;
    }

    let main = Series {
        series_id: main_id.to_string(),
        name: hierarchy.name.clone(),
        total_releases,
        max_index,
        releases: SeriesReleases::BySubSeries(years),
    };

    match store.save_new(&main_key, &main) {
        Ok(true) => {}
        Ok(false) => {
            log::warn!("  {} appeared during consolidation, not overwritten", main_id);
            stats.mains_skipped += 1;
            return ItemOutcome::Skipped;
        }
        Err(e) => {
            log::error!("  Failed to write {}: {}", main_id, e);
            stats.write_failures += 1;
            return ItemOutcome::Failed;
        }
    }
    stats.mains_written += 1;
    log::info!(
        "  {}: folded {} sub-series, {} release(s)",
        main_id,
        folded.len(),
        main.total_releases
    );

    let mut outcome = ItemOutcome::Done;
    for key in folded {
        match store.delete(&key) {
            Ok(_) => stats.subs_folded += 1,
            Err(e) => {
                log::error!("  Folded sub-series left on disk: {}", e);
                stats.write_failures += 1;
                outcome = ItemOutcome::Failed;
            }
        }
    }
    outcome
}
