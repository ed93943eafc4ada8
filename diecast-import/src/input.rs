//! Loading raw page records written by the scraper.
//!
//! Each `.json` file in the input directory holds either a list of pages or a
//! single page object. Pages are decoded one at a time so a malformed page
//! costs only itself.

use std::fs;
use std::path::{Path, PathBuf};

use diecast_catalog::types::RawPage;
use serde_json::Value;

use crate::error::ImportError;
use crate::progress::{ImportProgress, ItemOutcome};
use crate::transform::{PageBatch, transform_page};

/// Statistics from reading and transforming an input directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransformStats {
    pub files_read: u64,
    pub files_failed: u64,
    pub pages: u64,
    pub pages_failed: u64,
    pub rows_kept: u64,
    pub rows_skipped: u64,
}

/// `.json` files in `input_dir`, sorted by name.
///
/// An absent directory or one without any `.json` file is fatal: there is
/// nothing for a pass to do.
pub fn list_input_files(input_dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    if !input_dir.is_dir() {
        return Err(ImportError::InputNotFound(input_dir.display().to_string()));
    }

    let mut files: Vec<_> = fs::read_dir(input_dir)
        .map_err(|e| ImportError::InputRead {
            path: input_dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ImportError::NoInputFiles(input_dir.display().to_string()));
    }
    Ok(files)
}

/// Read the pages of one input file.
///
/// Only an unreadable file or invalid JSON fails the whole file. Each page
/// entry that does not decode as a page comes back as its own error.
pub fn read_input_file(
    path: &Path,
) -> Result<Vec<Result<RawPage, serde_json::Error>>, ImportError> {
    let contents = fs::read_to_string(path).map_err(|e| ImportError::InputRead {
        path: path.display().to_string(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| ImportError::InputParse {
        path: path.display().to_string(),
        source: e,
    })?;
    let entries = match value {
        Value::Array(entries) => entries,
        single => vec![single],
    };
    Ok(entries.into_iter().map(serde_json::from_value).collect())
}

/// Read every input file and transform its pages.
///
/// Unreadable files and undecodable pages are logged and skipped. Dropped
/// rows are logged with their reason and counted.
pub fn transform_dir(
    input_dir: &Path,
    progress: &dyn ImportProgress,
) -> Result<(Vec<PageBatch>, TransformStats), ImportError> {
    let files = list_input_files(input_dir)?;
    let mut stats = TransformStats::default();
    let mut batches = Vec::new();

    progress.on_phase(&format!(
        "Transforming {} input file(s) from {}",
        files.len(),
        input_dir.display()
    ));

    for (i, path) in files.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let pages = match read_input_file(path) {
            Ok(pages) => pages,
            Err(e) => {
                log::error!("Skipping input file: {}", e);
                stats.files_failed += 1;
                progress.on_item(i + 1, files.len(), &file_name, ItemOutcome::Failed);
                continue;
            }
        };
        stats.files_read += 1;
        let pages_failed_before = stats.pages_failed;

        for (page_number, page) in pages.iter().enumerate() {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    log::error!("  {}#{}: skipping malformed page: {}", file_name, page_number, e);
                    stats.pages_failed += 1;
                    continue;
                }
            };
            let source = page
                .source_file
                .clone()
                .unwrap_or_else(|| format!("{file_name}#{page_number}"));
            let batch = transform_page(page, &source);

            for skip in &batch.skipped {
                log::warn!(
                    "  {}: row {} of '{}' skipped: {}",
                    source,
                    skip.position + 1,
                    batch.casting.name,
                    skip.reason
                );
            }
            stats.pages += 1;
            stats.rows_kept += batch.rows.len() as u64;
            stats.rows_skipped += batch.skipped.len() as u64;
            batches.push(batch);
        }

        let outcome = if stats.pages_failed > pages_failed_before {
            ItemOutcome::Failed
        } else {
            ItemOutcome::Done
        };
        progress.on_item(i + 1, files.len(), &file_name, outcome);
    }

    progress.on_complete(&format!(
        "Transformed {} page(s): {} row(s) kept, {} skipped, {} malformed page(s), {} file(s) unreadable",
        stats.pages, stats.rows_kept, stats.rows_skipped, stats.pages_failed, stats.files_failed
    ));

    Ok((batches, stats))
}
