//! User settings and path resolution.
//!
//! The settings file is `~/.config/diecast/settings.toml`:
//! ```toml
//! [paths]
//! data_root = "/srv/diecast/data"
//! input_dir = "/srv/diecast/json"
//! hierarchies = "/srv/diecast/hierarchies.yaml"
//! ```
//! Every path resolves as CLI flag, then settings file, then default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

pub(crate) const DEFAULT_DATA_ROOT: &str = "data";
pub(crate) const DEFAULT_INPUT_DIR: &str = "json";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub paths: PathSettings,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct PathSettings {
    pub data_root: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub hierarchies: Option<PathBuf>,
}

/// Canonical path to the settings file: `~/.config/diecast/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("diecast").join("settings.toml")
}

/// Read settings from `path`. A missing file yields the defaults.
pub(crate) fn load_settings(path: &Path) -> Result<Settings, CliError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => {
            return Err(CliError::config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )));
        }
    };
    parse_settings(&contents)
        .map_err(|e| CliError::config(format!("invalid {}: {}", path.display(), e)))
}

fn parse_settings(contents: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(contents)
}

/// An empty string in the settings file means "not set".
fn non_empty(path: &Option<PathBuf>) -> Option<PathBuf> {
    path.as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .cloned()
}

impl Settings {
    pub(crate) fn data_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| non_empty(&self.paths.data_root))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT))
    }

    pub(crate) fn input_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| non_empty(&self.paths.input_dir))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR))
    }

    /// `None` selects the built-in hierarchy table.
    pub(crate) fn hierarchies(&self, cli_override: Option<PathBuf>) -> Option<PathBuf> {
        cli_override.or_else(|| non_empty(&self.paths.hierarchies))
    }
}
