//! Turn scraped wiki pages into the catalog's entity graph and maintain it.
//!
//! This crate owns all batch logic: transforming raw version-table rows,
//! merging them into the persisted graph (the organize pass), and the
//! maintenance passes that run over the graph afterwards: hierarchical
//! series consolidation, brand reassignment and legacy layout migration.

pub mod brands;
pub mod consolidate;
pub mod error;
pub mod input;
pub mod migrate;
pub mod organize;
pub mod progress;
pub mod series;
pub mod transform;

pub use brands::{BrandMove, ReassignStats, name_from_ref, reassign_brands};
pub use consolidate::{ConsolidateStats, consolidate_hierarchies, resolve_hierarchies};
pub use error::ImportError;
pub use input::{TransformStats, list_input_files, read_input_file, transform_dir};
pub use migrate::{MigrateStats, migrate_legacy_layout};
pub use organize::{OrganizeStats, RunContext, merge_and_persist, merge_page, organize};
pub use progress::{ImportProgress, ItemOutcome, LogProgress, SilentProgress};
pub use series::merge_series;
pub use transform::{
    CastingDraft, PageBatch, RowSkip, SeriesLabel, SeriesMembership, SkippedRow,
    TransformedRow, casting_draft, extract_year, split_base, split_series, split_wheel_types,
    transform_page, transform_row,
};
