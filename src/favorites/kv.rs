use crate::error::StorageError;
use std::collections::HashMap;
use std::path::PathBuf;

/// A small durable key-value slot store holding string values.
pub trait KeyValueStore: Send + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write(e.to_string()))?;

        // The slot always holds either the previous or the new value.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StorageError::Write(e.to_string()))?;
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::Write(e.to_string()))
    }
}

/// In-process store. An optional quota caps the size of any single value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self { values: HashMap::new(), quota: Some(quota) }
    }

    /// Seeds a raw value without quota checks.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded { needed: value.len(), limit });
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let mut store = FileStore::new(temp_dir.path().join("nested"));

        assert_eq!(store.get("slot")?, None);
        store.set("slot", "[1,2]")?;
        assert_eq!(store.get("slot")?.as_deref(), Some("[1,2]"));
        assert!(!store.path_for("slot").with_extension("json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::with_quota(4);
        assert!(store.set("k", "[1]").is_ok());
        assert_eq!(
            store.set("k", "[1,2,3]"),
            Err(StorageError::QuotaExceeded { needed: 7, limit: 4 })
        );
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1]"));
    }
}
