//! Brand reassignment: re-resolve every filed casting and move misfiled ones.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use diecast_catalog::store::{EntityKey, EntityKind, Store};
use diecast_catalog::types::{Brand, Casting};
use diecast_catalog::{humanize, ref_stem, resolve_manufacturer, slugify};
use regex::Regex;

use crate::error::{ImportError, require_data_root};
use crate::progress::{ImportProgress, ItemOutcome};

static NUMERIC_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-").expect("valid regex"));

/// One casting reference moved between brands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandMove {
    pub casting_ref: String,
    pub from: String,
    pub to: String,
    /// Display name of the target manufacturer.
    pub manufacturer: String,
}

/// Statistics from a reassignment pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReassignStats {
    pub brands_scanned: u64,
    pub brands_unreadable: u64,
    pub castings_checked: u64,
    pub brands_created: u64,
    pub brands_written: u64,
    pub castings_updated: u64,
    pub write_failures: u64,
    pub moves: Vec<BrandMove>,
}

/// Display name derived from a reference's file name, for castings whose
/// own file cannot be read: `"123-ferrari-f40"` becomes `"Ferrari F40"`.
pub fn name_from_ref(reference: &str) -> String {
    humanize(&NUMERIC_PREFIX_RE.replace(ref_stem(reference), ""))
}

fn casting_name(store: &Store, reference: &str) -> String {
    let key = EntityKey::Casting(ref_stem(reference).to_string());
    match store.load_or_absent::<Casting>(&key) {
        Some(casting) if !casting.name.trim().is_empty() => casting.name,
        _ => name_from_ref(reference),
    }
}

/// Move every casting reference to the brand its name resolves to.
///
/// Brands that fail to load are skipped. Missing target brands are created
/// with default attributes; existing ones keep theirs. A casting that moves
/// has its own `manufacturer` and `brand_id` updated.
pub fn reassign_brands(
    store: &Store,
    progress: &dyn ImportProgress,
) -> Result<ReassignStats, ImportError> {
    require_data_root(store)?;
    let mut stats = ReassignStats::default();

    let mut brands: BTreeMap<String, Brand> = BTreeMap::new();
    for id in store.list_ids(EntityKind::Brand)? {
        match store.load::<Brand>(&EntityKey::Brand(id.clone())) {
            Ok(Some(brand)) => {
                brands.insert(id, brand);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Skipping unreadable brand: {}", e);
                stats.brands_unreadable += 1;
            }
        }
    }
    stats.brands_scanned = brands.len() as u64;

    progress.on_phase(&format!("Checking castings of {} brand(s)", brands.len()));

    // Plan against the state as loaded, then apply.
    let mut planned = Vec::new();
    for (i, (brand_id, brand)) in brands.iter().enumerate() {
        for reference in &brand.castings {
            stats.castings_checked += 1;
            let manufacturer = resolve_manufacturer(&casting_name(store, reference));
            let target = slugify(manufacturer);
            if &target != brand_id {
                planned.push(BrandMove {
                    casting_ref: reference.clone(),
                    from: brand_id.clone(),
                    to: target,
                    manufacturer: manufacturer.to_string(),
                });
            }
        }
        progress.on_item(i + 1, brands.len(), &brand.name, ItemOutcome::Done);
    }

    let mut changed = BTreeSet::new();
    for planned_move in planned {
        let removed = brands
            .get_mut(&planned_move.from)
            .is_some_and(|brand| brand.remove_casting(&planned_move.casting_ref));
        if !removed {
            continue;
        }
        changed.insert(planned_move.from.clone());

        let target = brands.entry(planned_move.to.clone()).or_insert_with(|| {
            stats.brands_created += 1;
            Brand::new(&planned_move.manufacturer)
        });
        target.add_casting(&planned_move.casting_ref);
        changed.insert(planned_move.to.clone());

        log::info!(
            "  {} : {} -> {}",
            planned_move.casting_ref,
            planned_move.from,
            planned_move.to
        );
        update_casting(store, &planned_move, &mut stats);
        stats.moves.push(planned_move);
    }

    for brand_id in changed {
        let Some(brand) = brands.get(&brand_id) else {
            continue;
        };
        match store.save(&EntityKey::Brand(brand_id.clone()), brand) {
            Ok(()) => stats.brands_written += 1,
            Err(e) => {
                log::error!("Failed to save brand {}: {}", brand_id, e);
                stats.write_failures += 1;
            }
        }
    }

    progress.on_complete(&format!(
        "Checked {} casting(s) in {} brand(s): {} moved, {} brand(s) created, {} write failure(s)",
        stats.castings_checked,
        stats.brands_scanned,
        stats.moves.len(),
        stats.brands_created,
        stats.write_failures,
    ));

    Ok(stats)
}

fn update_casting(store: &Store, moved: &BrandMove, stats: &mut ReassignStats) {
    let key = EntityKey::Casting(ref_stem(&moved.casting_ref).to_string());
    let Some(mut casting) = store.load_or_absent::<Casting>(&key) else {
        return;
    };
    if casting.brand_id == moved.to && casting.manufacturer == moved.manufacturer {
        return;
    }
    casting.brand_id = moved.to.clone();
    casting.manufacturer = moved.manufacturer.clone();
    match store.save(&key, &casting) {
        Ok(()) => stats.castings_updated += 1,
        Err(e) => {
            log::error!("Failed to update casting {}: {}", casting.casting_id, e);
            stats.write_failures += 1;
        }
    }
}
