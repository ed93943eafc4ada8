//! Raw version-table rows to canonical release records.
//!
//! Everything here is pure: no file access, no logging. Rows that cannot be
//! turned into a release come back as [`RowSkip`] reasons so the caller can
//! report them and carry on.
//!
//! Free-text columns are split by small pattern functions:
//!
//! | column            | pattern                                  |
//! |-------------------|------------------------------------------|
//! | `Year`            | first `19xx`/`20xx` token                |
//! | `Series`          | trailing `<index>/<total>` at end of text |
//! | `Base Color/Type` | `" / "`, else `"/"`; type defaults to Plastic |
//! | `Wheel Type`      | `/`, `,` or `" and "`                    |

use std::collections::BTreeMap;
use std::sync::LazyLock;

use diecast_catalog::types::{
    Description, RawPage, RawRow, Release, ReleaseSpecs, UNKNOWN_DESIGNER,
};
use diecast_catalog::{resolve_manufacturer, slugify};
use regex::Regex;
use thiserror::Error;

/// Base type recorded when the base column names only a color.
pub const DEFAULT_BASE_TYPE: &str = "Plastic";

/// Casting name used when the page metadata has none.
pub const UNKNOWN_MODEL: &str = "Unknown Model";

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));

static SERIES_INDEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/(\d+)$").expect("valid regex"));

static WHEEL_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/|,| and ").expect("valid regex"));

/// Why a row produced no release.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSkip {
    #[error("malformed row: {0}")]
    Malformed(String),
    #[error("missing toy number")]
    MissingToyNumber,
    #[error("no recognizable year in {0:?}")]
    MissingYear(String),
}

/// A row that was dropped, with its position in the page's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub position: usize,
    pub reason: RowSkip,
}

/// Series name and position parsed from the `Series` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLabel {
    pub name: String,
    pub index: Option<u32>,
    pub total: Option<u32>,
}

/// The series a release belongs to, as seen by one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMembership {
    pub series_id: String,
    pub name: String,
    pub year: u16,
    pub index: Option<u32>,
}

/// Output of one row.
///
/// `release.release_id` is the unversioned identifier; the merge engine adds
/// a `-v<N>` suffix when the row collides with another in the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRow {
    pub release: Release,
    /// File name without extension or version suffix.
    pub file_stem: String,
    pub series: Option<SeriesMembership>,
}

/// Casting-level fields taken from page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastingDraft {
    pub casting_id: String,
    pub name: String,
    pub designer: String,
    pub manufacturer: String,
    pub brand_id: String,
    pub description: Description,
    pub image_url: Option<String>,
}

/// Everything one page contributes to the entity graph.
#[derive(Debug, Clone)]
pub struct PageBatch {
    /// Where the page came from, for diagnostics.
    pub source: String,
    pub casting: CastingDraft,
    pub rows: Vec<TransformedRow>,
    pub skipped: Vec<SkippedRow>,
}

/// First `19xx`/`20xx` token in free-form year text.
pub fn extract_year(text: &str) -> Option<u16> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Split `"Black / Metal"` (or `"Black/Metal"`) into color and type.
pub fn split_base(text: &str) -> (String, String) {
    let mut parts = if text.contains(" / ") {
        text.split(" / ")
    } else {
        text.split("/")
    };
    let color = parts.next().unwrap_or_default().trim().to_string();
    let base_type = parts
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_BASE_TYPE)
        .to_string();
    (color, base_type)
}

/// Split `"Treasure Hunts 3/10"` into its name and position.
///
/// The `<index>/<total>` pair is only recognized at the very end of the
/// text. Empty `()` markers are removed from the name.
pub fn split_series(text: &str) -> SeriesLabel {
    let text = text.trim();
    let (name, index, total) = match SERIES_INDEX_RE.captures(text) {
        Some(caps) => {
            let start = caps.get(0).map_or(text.len(), |m| m.start());
            (
                &text[..start],
                caps.get(1).and_then(|m| m.as_str().parse().ok()),
                caps.get(2).and_then(|m| m.as_str().parse().ok()),
            )
        }
        None => (text, None, None),
    };
    SeriesLabel {
        name: name.replace("()", "").trim().to_string(),
        index,
        total,
    }
}

/// Split a wheel column into position -> sub-type.
///
/// ```
/// use diecast_import::transform::split_wheel_types;
///
/// let wheels = split_wheel_types("5SP / PR5");
/// assert_eq!(wheels["0"], "5SP");
/// assert_eq!(wheels["1"], "PR5");
/// ```
pub fn split_wheel_types(text: &str) -> BTreeMap<String, String> {
    WHEEL_SEPARATOR_RE
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(position, part)| (position.to_string(), part.to_string()))
        .collect()
}

/// Photo column to position -> URL. Several URLs are separated by whitespace.
pub fn image_map(photo: &str) -> BTreeMap<String, String> {
    photo
        .split_whitespace()
        .enumerate()
        .map(|(position, url)| (position.to_string(), url.to_string()))
        .collect()
}

fn field_text(field: &Option<String>) -> &str {
    field.as_deref().map(str::trim).unwrap_or_default()
}

/// Turn one table row into a release of `casting_id`.
pub fn transform_row(row: &RawRow, casting_id: &str) -> Result<TransformedRow, RowSkip> {
    if let Some(error) = &row.malformed {
        return Err(RowSkip::Malformed(error.clone()));
    }
    let toy_number = field_text(&row.toy_number);
    if toy_number.is_empty() {
        return Err(RowSkip::MissingToyNumber);
    }
    let year_text = field_text(&row.year);
    let year =
        extract_year(year_text).ok_or_else(|| RowSkip::MissingYear(year_text.to_string()))?;

    let label = split_series(field_text(&row.series));
    let series = (!label.name.is_empty()).then(|| SeriesMembership {
        series_id: slugify(&label.name),
        name: label.name.clone(),
        year,
        index: label.index,
    });

    let (base_color, base_type) = split_base(field_text(&row.base));
    let file_stem = format!("{}-{}", slugify(toy_number), casting_id);

    let release = Release {
        release_id: format!("{file_stem}-{year}"),
        toy_number: toy_number.to_string(),
        casting_id: casting_id.to_string(),
        year,
        series_id: series.as_ref().map(|s| s.series_id.clone()),
        series_index: series.as_ref().and_then(|s| s.index),
        specs: ReleaseSpecs {
            color: field_text(&row.color).to_string(),
            tampo: field_text(&row.tampo).to_string(),
            base_color,
            base_type,
            window_color: field_text(&row.window_color).to_string(),
            interior_color: field_text(&row.interior_color).to_string(),
            wheel_type: split_wheel_types(field_text(&row.wheel_type)),
        },
        country: field_text(&row.country).to_string(),
        notes: field_text(&row.notes).to_string(),
        images: image_map(field_text(&row.photo)),
    };

    Ok(TransformedRow {
        release,
        file_stem,
        series,
    })
}

/// Casting fields from page metadata.
pub fn casting_draft(page: &RawPage) -> CastingDraft {
    let meta = |key: &str| {
        page.metadata
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let name = meta("name").unwrap_or(UNKNOWN_MODEL).to_string();
    let manufacturer = resolve_manufacturer(&name);
    CastingDraft {
        casting_id: slugify(&name),
        designer: meta("designer")
            .or_else(|| meta("Designer"))
            .unwrap_or(UNKNOWN_DESIGNER)
            .to_string(),
        manufacturer: manufacturer.to_string(),
        brand_id: slugify(manufacturer),
        description: page.description.clone(),
        image_url: meta("image_url").map(str::to_string),
        name,
    }
}

/// Transform every row of a page. Dropped rows are collected, not fatal.
pub fn transform_page(page: &RawPage, source: &str) -> PageBatch {
    let casting = casting_draft(page);
    let mut rows = Vec::with_capacity(page.releases.len());
    let mut skipped = Vec::new();

    for (position, row) in page.releases.iter().enumerate() {
        match transform_row(row, &casting.casting_id) {
            Ok(transformed) => rows.push(transformed),
            Err(reason) => skipped.push(SkippedRow { position, reason }),
        }
    }

    PageBatch {
        source: source.to_string(),
        casting,
        rows,
        skipped,
    }
}
