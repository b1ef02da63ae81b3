use super::KeyValueStorage;
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| Error::Storage {
            message: "Failed to acquire memory storage lock".to_string(),
        })
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() -> Result<()> {
        let storage = MemoryStorage::new();
        assert!(storage.get("nothing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_overwrites() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set("k", "first").await?;
        storage.set("k", "second").await?;
        assert_eq!(storage.get("k").await?, Some("second".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set("k", "v").await?;
        storage.remove("k").await?;
        storage.remove("k").await?;
        assert!(storage.get("k").await?.is_none());
        Ok(())
    }
}
