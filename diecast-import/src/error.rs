use diecast_catalog::{HierarchyError, StoreError};
use thiserror::Error;

/// Batch-level failures. Per-item problems are logged and counted in the
/// pass statistics instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),
    #[error("Input directory not found: {0}")]
    InputNotFound(String),
    #[error("No .json input files in {0}")]
    NoInputFiles(String),
    #[error("Data root not found: {0}")]
    DataRootNotFound(String),
    #[error("I/O error reading {path}: {source}")]
    InputRead {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    InputParse {
        path: String,
        source: serde_json::Error,
    },
}

/// Fail fast when a maintenance pass is pointed at a data root that is not there.
pub(crate) fn require_data_root(store: &diecast_catalog::Store) -> Result<(), ImportError> {
    if store.root().is_dir() {
        Ok(())
    } else {
        Err(ImportError::DataRootNotFound(
            store.root().display().to_string(),
        ))
    }
}
