//! Legacy layout migration.
//!
//! Older runs wrote one series file per year, `series/<year>/<id>.json`, each
//! with a flat reference list. This pass folds them into the single
//! `series/<id>.json` record and removes the per-year files.

use std::collections::{BTreeMap, BTreeSet};

use diecast_catalog::{humanize, slugify};
use diecast_catalog::store::{EntityKey, Store};
use diecast_catalog::types::{Series, SeriesReleases};

use crate::error::{ImportError, require_data_root};
use crate::progress::{ImportProgress, ItemOutcome};
use crate::series::{merge_series, union_years};

/// Statistics from a migration pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrateStats {
    pub legacy_files: u64,
    pub legacy_unreadable: u64,
    pub series_written: u64,
    pub files_removed: u64,
    pub dirs_removed: u64,
    pub write_failures: u64,
}

#[derive(Default)]
struct LegacyGroup {
    name: Option<String>,
    years: BTreeMap<String, BTreeSet<String>>,
    max_index: u32,
    keys: Vec<EntityKey>,
}

/// Fold every legacy per-year series file into the current layout.
pub fn migrate_legacy_layout(
    store: &Store,
    progress: &dyn ImportProgress,
) -> Result<MigrateStats, ImportError> {
    require_data_root(store)?;
    let mut stats = MigrateStats::default();

    let mut groups: BTreeMap<String, LegacyGroup> = BTreeMap::new();
    for key in store.legacy_series_keys()? {
        let EntityKey::LegacySeries { year, series_id } = &key else {
            continue;
        };
        stats.legacy_files += 1;

        let legacy: Series = match store.load(&key) {
            Ok(Some(legacy)) => legacy,
            Ok(None) => continue,
            Err(e) => {
                log::error!("Leaving unreadable legacy series in place: {}", e);
                stats.legacy_unreadable += 1;
                continue;
            }
        };

        // The record's own id wins over the file name it was saved under.
        let own_id = slugify(&legacy.series_id);
        let id = if own_id.is_empty() {
            series_id.clone()
        } else {
            own_id
        };
        let group = groups.entry(id).or_default();
        if group.name.is_none() && !legacy.name.trim().is_empty() {
            group.name = Some(legacy.name.clone());
        }
        group.max_index = group.max_index.max(legacy.max_index);

        // Legacy lists are filed under the year of the directory they sit in.
        let refs: BTreeSet<String> = legacy.releases.per_year().into_values().flatten().collect();
        union_years(&mut group.years, BTreeMap::from([(year.clone(), refs)]));
        group.keys.push(key.clone());
    }

    progress.on_phase(&format!(
        "Migrating {} legacy series from {} file(s)",
        groups.len(),
        stats.legacy_files
    ));

    let total = groups.len();
    for (i, (series_id, group)) in groups.into_iter().enumerate() {
        let total_releases: usize = group.years.values().map(BTreeSet::len).sum();
        let fresh = Series {
            name: group.name.unwrap_or_else(|| humanize(&series_id)),
            series_id: series_id.clone(),
            total_releases: total_releases as u32,
            max_index: group.max_index,
            releases: SeriesReleases::ByYear(group.years),
        };

        let key = EntityKey::Series(series_id.clone());
        let merged = merge_series(store.load_or_absent(&key), fresh);
        if let Err(e) = store.save(&key, &merged) {
            log::error!("Failed to save series {}: {}", series_id, e);
            stats.write_failures += 1;
            progress.on_item(i + 1, total, &series_id, ItemOutcome::Failed);
            continue;
        }
        stats.series_written += 1;

        let mut outcome = ItemOutcome::Done;
        for legacy_key in &group.keys {
            match store.delete(legacy_key) {
                Ok(_) => stats.files_removed += 1,
                Err(e) => {
                    log::error!("Migrated legacy series left on disk: {}", e);
                    stats.write_failures += 1;
                    outcome = ItemOutcome::Failed;
                }
            }
        }
        progress.on_item(i + 1, total, &series_id, outcome);
    }

    stats.dirs_removed = store.prune_empty_legacy_dirs()?.len() as u64;

    progress.on_complete(&format!(
        "Migrated {} series: {} legacy file(s) removed, {} empty year dir(s) removed, {} unreadable, {} write failure(s)",
        stats.series_written,
        stats.files_removed,
        stats.dirs_removed,
        stats.legacy_unreadable,
        stats.write_failures,
    ));

    Ok(stats)
}
