//! JSON file persistence for the entity graph.
//!
//! Layout under the data root:
//! ```text
//! data_root/
//!   castings/<casting-id>.json
//!   releases/<year>/<file-stem>.json
//!   series/<series-id>.json
//!   series/<year>/<series-id>.json      (legacy layout, read by `migrate`)
//!   brands/<brand-id>.json
//! ```
//! Files are UTF-8, indented with four spaces, with non-ASCII text written
//! as-is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("JSON encode error for {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
    #[error("Directory not found: {0}")]
    DirNotFound(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Entity families, one directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Casting,
    Release,
    Series,
    Brand,
}

impl EntityKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Casting => "castings",
            Self::Release => "releases",
            Self::Series => "series",
            Self::Brand => "brands",
        }
    }
}

/// Address of one entity file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Casting(String),
    Release { year: u16, file_stem: String },
    Series(String),
    Brand(String),
    /// Per-year series file of the old layout.
    LegacySeries { year: String, series_id: String },
}

impl EntityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Casting(_) => EntityKind::Casting,
            Self::Release { .. } => EntityKind::Release,
            Self::Series(_) | Self::LegacySeries { .. } => EntityKind::Series,
            Self::Brand(_) => EntityKind::Brand,
        }
    }

    fn relative_path(&self) -> PathBuf {
        let dir = Path::new(self.kind().dir_name());
        match self {
            Self::Casting(id) | Self::Series(id) | Self::Brand(id) => dir.join(format!("{id}.json")),
            Self::Release { year, file_stem } => {
                dir.join(year.to_string()).join(format!("{file_stem}.json"))
            }
            Self::LegacySeries { year, series_id } => {
                dir.join(year).join(format!("{series_id}.json"))
            }
        }
    }
}

/// File-backed entity store rooted at the `data/` directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &EntityKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    pub fn exists(&self, key: &EntityKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Read an entity. A missing file is `Ok(None)`.
    pub fn load<T: DeserializeOwned>(&self, key: &EntityKey) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })
    }

    /// Read an entity for merging: unreadable or malformed files count as
    /// absent and are reported through the log.
    pub fn load_or_absent<T: DeserializeOwned>(&self, key: &EntityKey) -> Option<T> {
        match self.load(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Treating unreadable entity as absent: {}", e);
                None
            }
        }
    }

    /// Write an entity, replacing any existing file.
    ///
    /// Parent directories are created on demand. Content goes to a temporary
    /// sibling first and is renamed into place.
    pub fn save<T: Serialize>(&self, key: &EntityKey, value: &T) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let bytes = to_pretty_json(value).map_err(|source| StoreError::Serialize {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }

    /// Write an entity only if no file exists yet. Returns `false` when the
    /// file was already present and left untouched.
    pub fn save_new<T: Serialize>(&self, key: &EntityKey, value: &T) -> Result<bool, StoreError> {
        if self.path_for(key).exists() {
            return Ok(false);
        }
        self.save(key, value)?;
        Ok(true)
    }

    /// Remove an entity file. Returns `false` if it did not exist.
    pub fn delete(&self, key: &EntityKey) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Identifiers of every top-level entity file of `kind`, sorted.
    ///
    /// A missing directory yields an empty list. Only files directly inside
    /// the kind's directory are listed.
    pub fn list_ids(&self, kind: EntityKind) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(kind.dir_name());
        Ok(json_files(&dir)?
            .into_iter()
            .filter_map(|path| file_stem(&path))
            .collect())
    }

    /// Every per-year series file of the old layout, ordered by year then id.
    pub fn legacy_series_keys(&self) -> Result<Vec<EntityKey>, StoreError> {
        let mut keys = Vec::new();
        for (year, dir) in self.year_dirs(EntityKind::Series)? {
            for path in json_files(&dir)? {
                if let Some(series_id) = file_stem(&path) {
                    keys.push(EntityKey::LegacySeries {
                        year: year.clone(),
                        series_id,
                    });
                }
            }
        }
        Ok(keys)
    }

    /// Remove year directories under `series/` that no longer hold anything.
    /// Returns the years removed.
    pub fn prune_empty_legacy_dirs(&self) -> Result<Vec<String>, StoreError> {
        let mut removed = Vec::new();
        for (year, dir) in self.year_dirs(EntityKind::Series)? {
            let mut entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
            if entries.next().is_none() {
                fs::remove_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
                removed.push(year);
            }
        }
        Ok(removed)
    }

    /// Numeric subdirectories of an entity directory, sorted by name.
    fn year_dirs(&self, kind: EntityKind) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let dir = self.root.join(kind.dir_name());
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut years: Vec<_> = fs::read_dir(&dir)
            .map_err(|e| StoreError::io(&dir, e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                (!name.is_empty() && name.chars().all(|c| c.is_ascii_digit()))
                    .then(|| (name, e.path()))
            })
            .collect();
        years.sort();
        Ok(years)
    }
}

/// Serialize with four-space indentation and a trailing newline.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// `.json` files directly inside `dir`, sorted by name.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(StoreError::DirNotFound(dir.display().to_string()));
    }

    let mut files: Vec<_> = fs::read_dir(dir)
        .map_err(|e| StoreError::io(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}
