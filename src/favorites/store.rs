use super::KeyValueStore;
use crate::domain::ProductId;
use crate::error::StorageError;
use tracing::{debug, error, warn};

pub const DEFAULT_FAVORITES_KEY: &str = "nexastore_favorites";

/// Favorited product ids in insertion order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: Vec<ProductId>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns false when `id` was already present.
    pub fn insert(&mut self, id: ProductId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns false when `id` was absent.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        self.ids.len() != before
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Persists the favorites set as a JSON array in a single key-value slot.
///
/// Reads never fail: an absent, unreadable or corrupt slot is logged and read
/// as empty. Writes report failure so callers can keep their previous state.
pub struct FavoritesStore {
    slot: Box<dyn KeyValueStore>,
    key: String,
}

impl FavoritesStore {
    pub fn new(slot: impl KeyValueStore) -> Self {
        Self::with_key(slot, DEFAULT_FAVORITES_KEY)
    }

    pub fn with_key(slot: impl KeyValueStore, key: impl Into<String>) -> Self {
        Self { slot: Box::new(slot), key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read(&self) -> FavoriteSet {
        let raw = match self.slot.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoriteSet::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read favorites, using empty set");
                return FavoriteSet::new();
            }
        };

        match serde_json::from_str::<Vec<ProductId>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                let error = StorageError::Corrupt { key: self.key.clone(), reason: e.to_string() };
                warn!(error = %error, "Failed to parse favorites, using empty set");
                FavoriteSet::new()
            }
        }
    }

    pub fn write(&mut self, favorites: &FavoriteSet) -> Result<(), StorageError> {
        let ids: Vec<ProductId> = favorites.iter().copied().collect();
        let encoded = serde_json::to_string(&ids).map_err(|e| StorageError::Write(e.to_string()))?;

        self.slot.set(&self.key, &encoded).inspect_err(|e| {
            error!(key = %self.key, error = %e, "Failed to save favorites");
        })?;
        debug!(key = %self.key, count = ids.len(), "Favorites saved");
        Ok(())
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.read().contains(id)
    }

    pub fn add(&mut self, id: ProductId) -> Result<FavoriteSet, StorageError> {
        let mut favorites = self.read();
        if favorites.insert(id) {
            self.write(&favorites)?;
        }
        Ok(favorites)
    }

    pub fn remove(&mut self, id: ProductId) -> Result<FavoriteSet, StorageError> {
        let mut favorites = self.read();
        favorites.remove(id);
        self.write(&favorites)?;
        Ok(favorites)
    }

    /// Flips membership of `id` and persists the result.
    pub fn toggle(&mut self, id: ProductId) -> Result<FavoriteSet, StorageError> {
        if self.contains(id) {
            self.remove(id)
        } else {
            self.add(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn set(ids: &[u64]) -> FavoriteSet {
        ids.iter().copied().map(ProductId).collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut store = FavoritesStore::new(MemoryStore::new());

        assert_eq!(store.toggle(ProductId(1)).unwrap(), set(&[1]));
        assert_eq!(store.read(), set(&[1]));

        assert_eq!(store.toggle(ProductId(1)).unwrap(), set(&[]));
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_absent_or_corrupt_slot_reads_empty() {
        assert!(FavoritesStore::new(MemoryStore::new()).read().is_empty());

        let corrupt = MemoryStore::new().with_value(DEFAULT_FAVORITES_KEY, "{not json");
        assert!(FavoritesStore::new(corrupt).read().is_empty());

        let wrong_shape = MemoryStore::new().with_value(DEFAULT_FAVORITES_KEY, r#"{"ids":[1]}"#);
        assert!(FavoritesStore::new(wrong_shape).read().is_empty());
    }

    #[test]
    fn test_stored_duplicates_collapse_in_order() {
        let slot = MemoryStore::new().with_value(DEFAULT_FAVORITES_KEY, "[3,1,3,2]");
        let store = FavoritesStore::new(slot);
        let ids: Vec<u64> = store.read().iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_write_failure_is_reported_and_slot_kept() {
        let slot = MemoryStore::with_quota(5).with_value(DEFAULT_FAVORITES_KEY, "[1]");
        let mut store = FavoritesStore::new(slot);

        let result = store.add(ProductId(12345));
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(store.read(), set(&[1]));
    }

    #[test]
    fn test_write_of_read_leaves_file_unchanged() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let files = FileStore::new(temp_dir.path());
        let path = files.path_for(DEFAULT_FAVORITES_KEY);
        let mut store = FavoritesStore::new(files);

        store.add(ProductId(4))?;
        store.add(ProductId(2))?;
        let before = std::fs::read_to_string(&path)?;

        let current = store.read();
        store.write(&current)?;
        assert_eq!(std::fs::read_to_string(&path)?, before);
        assert_eq!(before, "[4,2]");
        Ok(())
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let mut store = FavoritesStore::with_key(MemoryStore::new(), "custom");
        store.add(ProductId(5)).unwrap();
        assert_eq!(store.add(ProductId(5)).unwrap(), set(&[5]));
        store.remove(ProductId(5)).unwrap();
        assert_eq!(store.remove(ProductId(5)).unwrap(), set(&[]));
        assert_eq!(store.key(), "custom");
    }
}
