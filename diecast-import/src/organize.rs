//! The organize pass: fold transformed pages into the persisted entity graph.
//!
//! One page is handled completely (releases, casting, series, brand) before
//! the next. Existing files are merged, never blindly replaced, except for
//! release files, which are regenerated from their row on every run.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use diecast_catalog::store::{EntityKey, Store};
use diecast_catalog::types::{Brand, Casting, Series, SeriesReleases};
use diecast_catalog::{casting_ref, release_ref, slugify};
use serde::Serialize;

use crate::error::ImportError;
use crate::input::{TransformStats, transform_dir};
use crate::progress::{ImportProgress, ItemOutcome};
use crate::series::merge_series;
use crate::transform::PageBatch;

/// Release file names handed out during one run.
///
/// Two rows of the same run that map to the same `<year>/<file-stem>` get
/// distinct files: the first keeps the plain name, later ones are suffixed
/// `-v2`, `-v3`, ... Files left by earlier runs are not consulted, so a
/// rerun regenerates exactly the same names.
#[derive(Debug, Default)]
pub struct RunContext {
    claimed: HashMap<(u16, String), u32>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a file stem. Returns the stem to use and its version number
    /// (1 for the plain name).
    pub fn claim(&mut self, year: u16, base_stem: &str) -> (String, u32) {
        let count = self
            .claimed
            .entry((year, base_stem.to_string()))
            .or_insert(0);
        *count += 1;
        match *count {
            1 => (base_stem.to_string(), 1),
            n => (format!("{base_stem}-v{n}"), n),
        }
    }
}

/// Statistics from an organize run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrganizeStats {
    pub transform: TransformStats,
    pub pages: u64,
    pub releases_written: u64,
    pub releases_versioned: u64,
    pub castings_written: u64,
    pub series_written: u64,
    pub brands_written: u64,
    pub brand_moves: u64,
    pub write_failures: u64,
}

/// Transform every page under `input_dir` and merge it into `store`.
pub fn organize(
    store: &Store,
    input_dir: &Path,
    progress: &dyn ImportProgress,
) -> Result<OrganizeStats, ImportError> {
    let (batches, transform) = transform_dir(input_dir, progress)?;
    let mut stats = merge_and_persist(store, &batches, progress);
    stats.transform = transform;
    Ok(stats)
}

/// Merge already-transformed pages into `store` using a fresh [`RunContext`].
pub fn merge_and_persist(
    store: &Store,
    batches: &[PageBatch],
    progress: &dyn ImportProgress,
) -> OrganizeStats {
    let mut ctx = RunContext::new();
    let mut stats = OrganizeStats::default();

    progress.on_phase(&format!(
        "Organizing {} page(s) into {}",
        batches.len(),
        store.root().display()
    ));

    for (i, batch) in batches.iter().enumerate() {
        let failures_before = stats.write_failures;
        merge_page(store, &mut ctx, batch, &mut stats);
        let outcome = if stats.write_failures > failures_before {
            ItemOutcome::Failed
        } else {
            ItemOutcome::Done
        };
        progress.on_item(i + 1, batches.len(), &batch.casting.name, outcome);
    }

    progress.on_complete(&format!(
        "Organized {} page(s): {} release(s) ({} versioned), {} casting(s), {} series, {} brand(s), {} write failure(s)",
        stats.pages,
        stats.releases_written,
        stats.releases_versioned,
        stats.castings_written,
        stats.series_written,
        stats.brands_written,
        stats.write_failures,
    ));

    stats
}

/// Save one entity, logging and counting a failure instead of aborting.
fn persist<T: Serialize>(
    store: &Store,
    key: &EntityKey,
    value: &T,
    stats: &mut OrganizeStats,
) -> bool {
    match store.save(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to save {:?}: {}", key, e);
            stats.write_failures += 1;
            false
        }
    }
}

/// Per-page accumulation of one series.
struct SeriesFragment {
    name: String,
    years: BTreeMap<String, BTreeSet<String>>,
    max_index: u32,
}

/// Fold one page into the store.
pub fn merge_page(
    store: &Store,
    ctx: &mut RunContext,
    batch: &PageBatch,
    stats: &mut OrganizeStats,
) {
    let draft = &batch.casting;
    stats.pages += 1;

    // Releases
    let mut release_refs = Vec::with_capacity(batch.rows.len());
    let mut fragments: BTreeMap<String, SeriesFragment> = BTreeMap::new();

    for row in &batch.rows {
        let year = row.release.year;
        let (file_stem, version) = ctx.claim(year, &row.file_stem);
        let mut release = row.release.clone();
        if version > 1 {
            release.release_id = format!("{}-v{}", release.release_id, version);
            log::debug!(
                "  {} {} collides within this run, writing {}",
                year,
                row.file_stem,
                file_stem
            );
        }

        let reference = release_ref(year, &file_stem);
        let key = EntityKey::Release { year, file_stem };
        if !persist(store, &key, &release, stats) {
            continue;
        }
        stats.releases_written += 1;
        if version > 1 {
            stats.releases_versioned += 1;
        }

        if let Some(membership) = &row.series {
            let fragment = fragments
                .entry(membership.series_id.clone())
                .or_insert_with(|| SeriesFragment {
                    name: membership.name.clone(),
                    years: BTreeMap::new(),
                    max_index: 0,
                });
            fragment
                .years
                .entry(year.to_string())
                .or_default()
                .insert(reference.clone());
            fragment.max_index = fragment.max_index.max(membership.index.unwrap_or(0));
        }
        release_refs.push(reference);
    }

    // Casting
    let casting_key = EntityKey::Casting(draft.casting_id.clone());
    let existing: Option<Casting> = store.load_or_absent(&casting_key);
    // Castings written before `brand_id` existed carry only the manufacturer.
    let previous_brand = existing
        .as_ref()
        .map(|c| {
            if c.brand_id.is_empty() {
                slugify(&c.manufacturer)
            } else {
                c.brand_id.clone()
            }
        })
        .filter(|id| !id.is_empty() && *id != draft.brand_id);

    let mut casting = Casting {
        casting_id: draft.casting_id.clone(),
        name: draft.name.clone(),
        description: draft.description.clone(),
        designer: draft.designer.clone(),
        manufacturer: draft.manufacturer.clone(),
        brand_id: draft.brand_id.clone(),
        debut_year: None,
        image_url: draft.image_url.clone(),
        releases: Vec::new(),
    };
    if let Some(existing) = existing {
        if casting.description.pt_br.is_empty() {
            casting.description.pt_br = existing.description.pt_br;
        }
        if casting.image_url.is_none() {
            casting.image_url = existing.image_url;
        }
        casting.releases = existing.releases;
    }
    for reference in &release_refs {
        casting.add_release(reference);
    }
    casting.refresh_debut_year();
    if persist(store, &casting_key, &casting, stats) {
        stats.castings_written += 1;
    }

    // Series
    for (series_id, fragment) in fragments {
        let key = EntityKey::Series(series_id.clone());
        let releases = SeriesReleases::ByYear(fragment.years);
        let fresh = Series {
            series_id,
            name: fragment.name,
            total_releases: releases.distinct_count() as u32,
            max_index: fragment.max_index,
            releases,
        };
        let merged = merge_series(store.load_or_absent(&key), fresh);
        if persist(store, &key, &merged, stats) {
            stats.series_written += 1;
        }
    }

    // Brand
    let reference = casting_ref(&draft.casting_id);
    if let Some(old_id) = previous_brand {
        let old_key = EntityKey::Brand(old_id.clone());
        if let Some(mut old) = store.load_or_absent::<Brand>(&old_key) {
            if old.remove_casting(&reference) && persist(store, &old_key, &old, stats) {
                log::info!(
                    "  Moved {} from brand {} to {}",
                    reference,
                    old_id,
                    draft.brand_id
                );
                stats.brand_moves += 1;
                stats.brands_written += 1;
            }
        }
    }

    let brand_key = EntityKey::Brand(draft.brand_id.clone());
    let mut brand = store
        .load_or_absent::<Brand>(&brand_key)
        .unwrap_or_else(|| Brand::new(&draft.manufacturer));
    brand.add_casting(&reference);
    if persist(store, &brand_key, &brand, stats) {
        stats.brands_written += 1;
    }
}
