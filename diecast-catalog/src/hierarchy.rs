//! Main series / sub-series mapping used by hierarchical consolidation.
//!
//! The mapping is human-curated YAML:
//! ```yaml
//! car-culture:
//!   name: Car Culture
//!   sub_series:
//!     - car-culture-air-cooled
//!     - car-culture-exotic-envy
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_HIERARCHIES: &str = include_str!("../data/hierarchies.yaml");

#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
}

/// One main series and the sub-series folded into it, in fold order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub name: String,
    #[serde(default)]
    pub sub_series: Vec<String>,
}

/// Main series id -> hierarchy.
pub type HierarchyMap = BTreeMap<String, Hierarchy>;

/// The built-in mapping (Car Culture and Pop Culture families).
pub fn default_hierarchies() -> Result<HierarchyMap, HierarchyError> {
    parse_hierarchies(DEFAULT_HIERARCHIES, "<built-in>")
}

/// Load a mapping from a YAML file.
pub fn load_hierarchies(path: &Path) -> Result<HierarchyMap, HierarchyError> {
    let contents = std::fs::read_to_string(path).map_err(|e| HierarchyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_hierarchies(&contents, &path.display().to_string())
}

fn parse_hierarchies(contents: &str, origin: &str) -> Result<HierarchyMap, HierarchyError> {
    let mut map: HierarchyMap =
        serde_yml::from_str(contents).map_err(|e| HierarchyError::Parse {
            path: origin.to_string(),
            source: e,
        })?;

    // A sub-series listed twice would be folded (and counted) twice.
    for hierarchy in map.values_mut() {
        let mut seen = std::collections::BTreeSet::new();
        hierarchy.sub_series.retain(|id| seen.insert(id.clone()));
    }
    Ok(map)
}
