//! Cross-reference strings stored inside entity files.
//!
//! References always use the `data/` prefix, independent of where the data
//! root lives on disk:
//! ```text
//! data/castings/<casting-id>.json
//! data/releases/<year>/<file-stem>.json
//! ```

/// Leading path segment of every stored reference.
pub const REF_ROOT: &str = "data";

pub fn casting_ref(casting_id: &str) -> String {
    format!("{REF_ROOT}/castings/{casting_id}.json")
}

pub fn release_ref(year: u16, file_stem: &str) -> String {
    format!("{REF_ROOT}/releases/{year}/{file_stem}.json")
}

/// Year segment of a release reference.
pub fn ref_year(reference: &str) -> Option<u16> {
    let mut parts = reference.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(REF_ROOT), Some("releases"), Some(year)) => year.parse().ok(),
        _ => None,
    }
}

/// File name without directories or the `.json` extension.
pub fn ref_stem(reference: &str) -> &str {
    let file = reference.rsplit('/').next().unwrap_or(reference);
    file.strip_suffix(".json").unwrap_or(file)
}
