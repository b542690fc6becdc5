// src/core/cache/persistence.rs

//! Best-effort snapshot persistence for the response cache.
//!
//! The snapshot is a JSON mapping from cache key to `{value, timestamp}`.
//! It is reloaded wholesale at startup and written atomically: the payload
//! goes to a randomized temp file in the same directory, which is then
//! renamed over the destination, so a crash mid-write never corrupts the
//! last consistent snapshot.

use super::{CacheEntry, ResponseCache};
use crate::core::DispatchError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads a snapshot into the cache. A missing file is an empty cache, not
/// an error. Returns the number of restored entries.
pub fn load(cache: &ResponseCache, path: &Path) -> Result<usize, DispatchError> {
    if !path.exists() {
        return Ok(0);
    }

    let contents = fs::read_to_string(path)?;
    let entries: BTreeMap<String, CacheEntry> = serde_json::from_str(&contents)?;
    let count = entries.len();
    cache.restore(entries);
    Ok(count)
}

/// Writes the current cache contents to `path` atomically. Returns the
/// number of persisted entries.
pub fn save(cache: &ResponseCache, path: &Path) -> Result<usize, DispatchError> {
    let snapshot = cache.snapshot();
    let count = snapshot.len();
    let payload = serde_json::to_vec(&snapshot)?;

    let temp_path = PathBuf::from(format!("{}.tmp.{}", path.display(), rand::random::<u32>()));
    fs::write(&temp_path, payload)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(count)
}
