//! Local persistence adapter for anonymous shopper sessions.
//!
//! Anonymous carts, wishlists, and search history live outside the database
//! in one JSON document per key under a configurable directory. Writes are
//! best-effort: a failed write is logged and dropped, leaving in-memory
//! state as the only source of truth for the session. Reads that hit a
//! missing or unparsable document return `None` so callers fall back to an
//! empty collection.

use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Storage key for the anonymous cart.
pub const CART_KEY: &str = "cart";
/// Storage key for the anonymous wishlist.
pub const WISHLIST_KEY: &str = "wishlist";
/// Storage key for recent search terms.
pub const SEARCH_HISTORY_KEY: &str = "search_history";

/// File-per-key JSON store for shopper session data.
///
/// No locking is performed; when two writers race, the last write wins.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads and deserializes the value stored under `key`.
    ///
    /// Returns `None` when the key is absent or the stored document cannot
    /// be parsed; a parse failure is logged and the document is left in
    /// place.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let contents = fs::read_to_string(self.path(key)).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable local data for '{key}': {e}");
                None
            }
        }
    }

    /// Serializes `value` under `key`, best-effort.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_write(key, value) {
            warn!("Failed to persist local data for '{key}': {e}");
        }
    }

    fn try_write<T: Serialize>(&self, key: &str, value: &T) -> crate::errors::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string(value)?;
        fs::write(self.path(key), contents)?;
        Ok(())
    }

    /// Deletes the document stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        let path = self.path(key);
        if path.exists()
            && let Err(e) = fs::remove_file(&path)
        {
            warn!("Failed to remove local data for '{key}': {e}");
        }
    }
}
