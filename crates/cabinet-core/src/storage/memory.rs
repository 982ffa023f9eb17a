//! In-memory storage, used as the test fake and for throwaway sessions.

use std::collections::HashMap;

use super::{Storage, StorageError, StorageResult};

/// `HashMap`-backed storage with an optional byte quota.
///
/// The quota counts key and value lengths, mirroring how browser storage
/// rejects writes once its budget is spent.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes pushing total usage past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Bytes in use (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let replaced = self.items.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let available = quota.saturating_sub(self.used_bytes() - replaced);
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("v2".to_string()));
        assert_eq!(storage.len(), 1);

        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_quota_exceeded() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("ab", "123456").unwrap();

        let err = storage.set_item("cd", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded { needed: 7, available: 2, .. }
        ));
        assert_eq!(storage.get_item("cd").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("ab", "12345678").unwrap();
        // Overwriting frees the old value first
        storage.set_item("ab", "87654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }
}
