//! Data model types for the die-cast catalog.
//!
//! These types represent the persisted entity graph (castings, releases,
//! series, brands) and the raw page records handed over by the scraper.
//! Optional fields carry documented defaults so older or hand-edited files
//! still load.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Country recorded for brands nobody has curated yet.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Designer recorded when the page metadata names none.
pub const UNKNOWN_DESIGNER: &str = "Unknown";

/// Year bucket used for series references whose year cannot be recovered.
pub const UNKNOWN_YEAR: &str = "unknown";

fn unknown_country() -> String {
    UNKNOWN_COUNTRY.to_string()
}

fn unknown_designer() -> String {
    UNKNOWN_DESIGNER.to_string()
}

// ── Description ─────────────────────────────────────────────────────────────

/// Bilingual free text. The Portuguese half is filled in by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DescriptionRepr")]
pub struct Description {
    #[serde(rename = "en-us")]
    pub en_us: String,
    #[serde(rename = "pt-br")]
    pub pt_br: String,
}

impl Description {
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en_us: text.into(),
            pt_br: String::new(),
        }
    }
}

/// Older brand files stored the description as a bare English string.
#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptionRepr {
    Text(String),
    Localized {
        #[serde(rename = "en-us", default)]
        en_us: String,
        #[serde(rename = "pt-br", default)]
        pt_br: String,
    },
}

impl From<DescriptionRepr> for Description {
    fn from(repr: DescriptionRepr) -> Self {
        match repr {
            DescriptionRepr::Text(en_us) => Self {
                en_us,
                pt_br: String::new(),
            },
            DescriptionRepr::Localized { en_us, pt_br } => Self { en_us, pt_br },
        }
    }
}

// ── Casting ─────────────────────────────────────────────────────────────────

/// A sculpt/mold, independent of paint scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casting {
    pub casting_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Description,
    #[serde(default = "unknown_designer")]
    pub designer: String,
    /// Manufacturer display name as resolved from `name`.
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub brand_id: String,
    /// Minimum year across `releases`, `None` while there are none.
    #[serde(default)]
    pub debut_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Release references in first-seen order, without duplicates.
    #[serde(default)]
    pub releases: Vec<String>,
}

impl Casting {
    /// Append a release reference unless it is already listed.
    pub fn add_release(&mut self, reference: &str) -> bool {
        if self.releases.iter().any(|r| r == reference) {
            return false;
        }
        self.releases.push(reference.to_string());
        true
    }

    /// Recompute `debut_year` from the years encoded in the release references.
    pub fn refresh_debut_year(&mut self) {
        self.debut_year = self
            .releases
            .iter()
            .filter_map(|r| crate::refs::ref_year(r))
            .min();
    }
}

// ── Release ─────────────────────────────────────────────────────────────────

/// Paint and trim details of a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSpecs {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tampo: String,
    #[serde(default)]
    pub base_color: String,
    #[serde(default)]
    pub base_type: String,
    #[serde(default)]
    pub window_color: String,
    #[serde(default)]
    pub interior_color: String,
    /// Position (`"0"`, `"1"`, ...) to wheel sub-type.
    #[serde(default)]
    pub wheel_type: BTreeMap<String, String>,
}

/// One painted/packaged variant of a casting in a specific year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub release_id: String,
    /// Toy number as printed on the card.
    pub toy_number: String,
    pub casting_id: String,
    pub year: u16,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub series_index: Option<u32>,
    #[serde(default)]
    pub specs: ReleaseSpecs,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub notes: String,
    /// Position to image URL.
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

// ── Series ──────────────────────────────────────────────────────────────────

/// Release references of a series.
///
/// Plain series are keyed by year. Consolidated main series add a second
/// level keyed by sub-series id. `Legacy` is the flat list written by the
/// old per-year layout and is only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesReleases {
    ByYear(BTreeMap<String, BTreeSet<String>>),
    BySubSeries(BTreeMap<String, BTreeMap<String, BTreeSet<String>>>),
    Legacy(Vec<String>),
}

impl Default for SeriesReleases {
    fn default() -> Self {
        Self::ByYear(BTreeMap::new())
    }
}

impl SeriesReleases {
    /// Collapse any shape into year -> references.
    pub fn per_year(&self) -> BTreeMap<String, BTreeSet<String>> {
        match self {
            Self::ByYear(years) => years.clone(),
            Self::BySubSeries(years) => years
                .iter()
                .map(|(year, subs)| (year.clone(), subs.values().flatten().cloned().collect()))
                .collect(),
            Self::Legacy(list) => {
                let mut years = BTreeMap::new();
                if !list.is_empty() {
                    years.insert(UNKNOWN_YEAR.to_string(), list.iter().cloned().collect());
                }
                years
            }
        }
    }

    /// Number of distinct references across every year and sub-series.
    pub fn distinct_count(&self) -> usize {
        match self {
            Self::ByYear(years) => years.values().flatten().collect::<BTreeSet<_>>().len(),
            Self::BySubSeries(years) => years
                .values()
                .flat_map(|subs| subs.values().flatten())
                .collect::<BTreeSet<_>>()
                .len(),
            Self::Legacy(list) => list.iter().collect::<BTreeSet<_>>().len(),
        }
    }

    pub fn contains(&self, year: &str, reference: &str) -> bool {
        match self {
            Self::ByYear(years) => years.get(year).is_some_and(|refs| refs.contains(reference)),
            Self::BySubSeries(years) => years
                .get(year)
                .is_some_and(|subs| subs.values().any(|refs| refs.contains(reference))),
            Self::Legacy(list) => list.iter().any(|r| r == reference),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distinct_count() == 0
    }
}

/// A named grouping of releases issued together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub series_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_releases: u32,
    #[serde(default)]
    pub max_index: u32,
    #[serde(default)]
    pub releases: SeriesReleases,
}

// ── Brand ───────────────────────────────────────────────────────────────────

/// A manufacturer and the castings filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub brand_id: String,
    pub name: String,
    #[serde(default = "unknown_country")]
    pub country: String,
    #[serde(default)]
    pub founded_year: Option<u16>,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub castings: BTreeSet<String>,
}

impl Brand {
    /// A fresh brand with default country and the stock bilingual description.
    pub fn new(name: &str) -> Self {
        Self {
            brand_id: crate::slug::slugify(name),
            name: name.to_string(),
            country: unknown_country(),
            founded_year: None,
            description: Description {
                en_us: format!("Manufacturer of {name} vehicles."),
                pt_br: format!("Fabricante de veículos {name}."),
            },
            castings: BTreeSet::new(),
        }
    }

    pub fn add_casting(&mut self, reference: &str) -> bool {
        self.castings.insert(reference.to_string())
    }

    pub fn remove_casting(&mut self, reference: &str) -> bool {
        self.castings.remove(reference)
    }
}

// ── Raw input ───────────────────────────────────────────────────────────────

/// One wiki page as produced by the scraper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub releases: Vec<RawRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// One row of a page's version table. Every column is optional.
///
/// A row whose columns do not decode (a number where text belongs, say)
/// still deserializes; the decode error is kept in `malformed` and the
/// columns are left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct RawRow {
    #[serde(rename = "Toy #")]
    pub toy_number: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Series")]
    pub series: Option<String>,
    #[serde(rename = "Color")]
    pub color: Option<String>,
    #[serde(rename = "Tampo")]
    pub tampo: Option<String>,
    #[serde(rename = "Base Color/Type")]
    pub base: Option<String>,
    #[serde(rename = "Window Color")]
    pub window_color: Option<String>,
    #[serde(rename = "Interior Color")]
    pub interior_color: Option<String>,
    #[serde(rename = "Wheel Type")]
    pub wheel_type: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
    #[serde(rename = "Photo")]
    pub photo: Option<String>,
    #[serde(skip)]
    pub malformed: Option<String>,
}

#[derive(Deserialize)]
struct RowColumns {
    #[serde(rename = "Toy #", default)]
    toy_number: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Series", default)]
    series: Option<String>,
    #[serde(rename = "Color", default)]
    color: Option<String>,
    #[serde(rename = "Tampo", default)]
    tampo: Option<String>,
    #[serde(rename = "Base Color/Type", default)]
    base: Option<String>,
    #[serde(rename = "Window Color", default)]
    window_color: Option<String>,
    #[serde(rename = "Interior Color", default)]
    interior_color: Option<String>,
    #[serde(rename = "Wheel Type", default)]
    wheel_type: Option<String>,
    #[serde(rename = "Country", default)]
    country: Option<String>,
    #[serde(rename = "Notes", default)]
    notes: Option<String>,
    #[serde(rename = "Photo", default)]
    photo: Option<String>,
}

impl From<serde_json::Value> for RawRow {
    fn from(value: serde_json::Value) -> Self {
        match serde_json::from_value::<RowColumns>(value) {
            Ok(c) => Self {
                toy_number: c.toy_number,
                year: c.year,
                series: c.series,
                color: c.color,
                tampo: c.tampo,
                base: c.base,
                window_color: c.window_color,
                interior_color: c.interior_color,
                wheel_type: c.wheel_type,
                country: c.country,
                notes: c.notes,
                photo: c.photo,
                malformed: None,
            },
            Err(e) => Self {
                malformed: Some(e.to_string()),
                ..Self::default()
            },
        }
    }
}
