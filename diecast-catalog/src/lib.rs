//! Die-cast catalog data model, identifiers and JSON persistence.
//!
//! This crate defines the persisted entity graph (castings, releases, series,
//! brands), the identifier and manufacturer rules every pass shares, and the
//! file store the passes read from and write to.

pub mod hierarchy;
pub mod manufacturer;
pub mod refs;
pub mod slug;
pub mod store;
pub mod types;

pub use hierarchy::{
    Hierarchy, HierarchyError, HierarchyMap, default_hierarchies, load_hierarchies,
};
pub use manufacturer::{FALLBACK_MANUFACTURER, resolve_manufacturer};
pub use refs::{casting_ref, ref_stem, ref_year, release_ref};
pub use slug::{UNKNOWN_SLUG, humanize, slugify};
pub use store::{EntityKey, EntityKind, Store, StoreError};
pub use types::*;
