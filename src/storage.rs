//! JSON artifact persistence
//!
//! Every pipeline stage communicates through JSON files on disk. Reports are
//! written as full replacements; the alert and decision logs are append-only.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DriftwatchError, Result};

/// Load an artifact that may legitimately not exist yet.
///
/// A missing file means "no data" and returns `Ok(None)`. A file that exists
/// but fails to parse indicates pipeline corruption and is a hard error.
pub fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents).map_err(|e| DriftwatchError::ArtifactError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(value))
}

/// Load an artifact that must exist for the calling stage to proceed
pub fn load_required<T: DeserializeOwned>(path: &Path) -> Result<T> {
    load_optional(path)?.ok_or_else(|| DriftwatchError::ArtifactError {
        path: path.to_path_buf(),
        reason: "required artifact does not exist".to_string(),
    })
}

/// Write an artifact as pretty-printed JSON, replacing any previous version.
///
/// Writes to a sibling temp file and renames into place so a reader never
/// observes a half-written artifact.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes())?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Append entries to an on-disk log, creating it if absent.
///
/// Read-modify-append: prior entries are preserved verbatim as a prefix of
/// the new log.
pub fn append_log<T: Serialize + DeserializeOwned + Clone>(
    path: &Path,
    new_entries: &[T],
) -> Result<()> {
    let mut log: Vec<T> = load_optional(path)?.unwrap_or_default();
    log.extend_from_slice(new_entries);
    save(path, &log)
}
