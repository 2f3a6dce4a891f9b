//! Durable local key-value storage for persisted client state.
//!
//! Each key maps to one JSON document under the data directory
//! (`<dir>/<key>.json`). Two keys are in use: the serialized favorites
//! array and the catalog-store snapshot.
//!
//! **Corrupt persisted state is not fatal:** a document that fails to
//! deserialize reads as absent (with a logged warning) so the owning store
//! falls back to its default state.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use pokedex_shared::{CatalogSnapshot, PokedexError, Result};

/// Key for the serialized favorites array.
pub const FAVORITES_KEY: &str = "pokemon-favorites";

/// Key for the catalog-store snapshot.
pub const CATALOG_KEY: &str = "pokemon-store";

/// Handle to the on-disk key-value store.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| PokedexError::io(dir, e))?;
        Ok(Self {
            root: dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    // -----------------------------------------------------------------------
    // Generic key-value access
    // -----------------------------------------------------------------------

    /// Read and deserialize the value under `key`.
    ///
    /// Returns `None` when the key is absent or its document is corrupt.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(?path, error = %e, "failed to read persisted state");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(?path, error = %e, "corrupt persisted state, falling back to defaults");
                None
            }
        }
    }

    /// Serialize and write `value` under `key`.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        let content =
            serde_json::to_string(value).map_err(|e| PokedexError::Storage(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| PokedexError::io(&path, e))?;
        debug!(key, "persisted state written");
        Ok(())
    }

    /// Remove the value under `key`, if present.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PokedexError::io(&path, e)),
        }
    }

    // -----------------------------------------------------------------------
    // Typed accessors for the two well-known keys
    // -----------------------------------------------------------------------

    /// Load the favorites id list, empty when absent or corrupt.
    pub fn load_favorites(&self) -> Vec<u32> {
        self.read_json(FAVORITES_KEY).unwrap_or_default()
    }

    /// Persist the favorites id list.
    pub fn save_favorites(&self, ids: &[u32]) -> Result<()> {
        self.write_json(FAVORITES_KEY, &ids)
    }

    /// Load the catalog snapshot, if one was persisted and is readable.
    pub fn load_catalog(&self) -> Option<CatalogSnapshot> {
        self.read_json(CATALOG_KEY)
    }

    /// Persist the catalog snapshot.
    pub fn save_catalog(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        self.write_json(CATALOG_KEY, snapshot)
    }
}
