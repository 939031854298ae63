use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{KeyValueStorage, StorageError, StorageKey};

/// Process-local storage. Used by tests and when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: Mutex<HashMap<StorageKey, String>>,
    offline: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot with raw text, bypassing the store.
    pub fn with_item(self, key: StorageKey, value: impl Into<String>) -> Self {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.into());
        self
    }

    /// Makes every subsequent call fail with [`StorageError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Raw slot contents, bypassing the offline flag.
    pub fn raw(&self, key: StorageKey) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("in-memory storage is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.check_online()?;
        Ok(self.raw(key))
    }

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.check_online()?;
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: StorageKey) -> Result<(), StorageError> {
        self.check_online()?;
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        Ok(())
    }
}
