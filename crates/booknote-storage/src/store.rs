//! Typed access to local storage.

use crate::{LocalStorage, MemoryStorage, StorageKeys, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Shared handle to a storage backend.
///
/// Cheap to clone; every clone sees the same backend. The HTTP gateway reads
/// the access token through it and the session manager writes it.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn LocalStorage>,
}

impl LocalStore {
    pub fn new(backend: impl LocalStorage + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn LocalStorage>) -> Self {
        Self { backend }
    }

    /// A store over fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    // ========================================
    // Access token
    // ========================================

    pub fn access_token(&self) -> StorageResult<Option<String>> {
        self.backend.get(StorageKeys::ACCESS_TOKEN)
    }

    pub fn set_access_token(&self, token: &str) -> StorageResult<()> {
        self.backend.set(StorageKeys::ACCESS_TOKEN, token)
    }

    pub fn clear_access_token(&self) -> StorageResult<bool> {
        self.backend.delete(StorageKeys::ACCESS_TOKEN)
    }

    // ========================================
    // JSON records
    // ========================================

    /// Read and decode a JSON record.
    ///
    /// A record that no longer decodes is logged and reported as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = key, error = %e, "ignoring undecodable stored record");
                Ok(None)
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        self.backend.delete(key)
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[test]
    fn test_access_token_lifecycle() {
        let store = LocalStore::in_memory();
        assert_eq!(store.access_token().unwrap(), None);

        store.set_access_token("abc").unwrap();
        assert_eq!(store.access_token().unwrap(), Some("abc".to_string()));

        assert!(store.clear_access_token().unwrap());
        assert_eq!(store.access_token().unwrap(), None);
    }

    #[test]
    fn test_clones_share_backend() {
        let store = LocalStore::in_memory();
        let clone = store.clone();

        store.set_access_token("shared").unwrap();
        assert_eq!(clone.access_token().unwrap(), Some("shared".to_string()));
    }

    #[test]
    fn test_json_roundtrip() {
        let store = LocalStore::in_memory();
        let record = Record {
            name: "reader".to_string(),
            count: 3,
        };

        store.set_json("record", &record).unwrap();
        let loaded: Option<Record> = store.get_json("record").unwrap();
        assert_eq!(loaded, Some(record));

        assert!(store.remove("record").unwrap());
        let missing: Option<Record> = store.get_json("record").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_undecodable_record_reads_as_none() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("record", "[1, 2, 3]").unwrap();

        let store = LocalStore::from_arc(storage);
        let loaded: Option<Record> = store.get_json("record").unwrap();
        assert!(loaded.is_none());
    }
}
