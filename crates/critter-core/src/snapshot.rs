//! JSON persistence helpers for [`CritterSnapshot`].
//!
//! The snapshot shape is defined in `critter-types`; this module only
//! moves it to and from JSON text and files. Saving writes a sibling
//! temporary file first and renames it over the target, so a crash
//! mid-write leaves the previous save intact.

use std::path::Path;

use critter_types::CritterSnapshot;
use tracing::{debug, info};

/// Errors that can occur when persisting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the save file failed.
    #[error("snapshot I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The save file is not a valid snapshot.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Serialize a snapshot to pretty-printed JSON.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if serialization fails.
pub fn to_json(snapshot: &CritterSnapshot) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parse a snapshot from JSON.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if the text is not a valid snapshot.
pub fn from_json(json: &str) -> Result<CritterSnapshot, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Write a snapshot to `path`, replacing any previous save.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be written, or
/// [`SnapshotError::Json`] if serialization fails.
pub fn save(path: &Path, snapshot: &CritterSnapshot) -> Result<(), SnapshotError> {
    let json = to_json(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    info!(path = %path.display(), id = %snapshot.id, "Snapshot saved");
    Ok(())
}

/// Read a snapshot from `path`. A missing file is `Ok(None)`.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file exists but cannot be read, or
/// [`SnapshotError::Json`] if it is not a valid snapshot.
pub fn load(path: &Path) -> Result<Option<CritterSnapshot>, SnapshotError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No snapshot found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let snapshot = from_json(&contents)?;
    info!(path = %path.display(), id = %snapshot.id, "Snapshot loaded");
    Ok(Some(snapshot))
}
