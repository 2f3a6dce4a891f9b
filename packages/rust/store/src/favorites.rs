//! Favorites store: a persisted set of favorited entry identifiers.
//!
//! Every effective mutation writes through to local storage synchronously.
//! A load-time deserialization failure resets to the empty set (handled in
//! the storage layer) rather than propagating an error.

use tracing::warn;

use pokedex_storage::Storage;

/// Persisted set of favorited identifiers. Membership is stable; order is
/// incidental (insertion order is kept for display).
pub struct FavoritesStore {
    storage: Storage,
    ids: Vec<u32>,
}

impl FavoritesStore {
    /// Create a store, restoring persisted favorites from `storage`.
    pub fn new(storage: Storage) -> Self {
        let ids = storage.load_favorites();
        Self { storage, ids }
    }

    /// Favorited ids in insertion order.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn has_favorites(&self) -> bool {
        !self.ids.is_empty()
    }

    /// Add `id` to the set. Returns whether the set changed.
    pub fn add(&mut self, id: u32) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        self.persist();
        true
    }

    /// Remove `id` from the set. Returns whether the set changed.
    pub fn remove(&mut self, id: u32) -> bool {
        let Some(index) = self.ids.iter().position(|&i| i == id) else {
            return false;
        };
        self.ids.remove(index);
        self.persist();
        true
    }

    /// Flip membership of `id`. Returns whether `id` is now a favorite.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.is_favorite(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Empty the set.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    /// Write-through persistence. A write failure is logged and does not
    /// fail the mutation that triggered it.
    fn persist(&self) {
        if let Err(e) = self.storage.save_favorites(&self.ids) {
            warn!(error = %e, "failed to persist favorites");
        }
    }
}
