//! Durable key-value slots the store mirrors its collections into.
//!
//! Values are opaque text (JSON for the collections, the raw credential for
//! the API key). Backends only need get/set/remove on a string key.

mod memory;
mod sqlite;

pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// The four persisted slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Medications,
    Symptoms,
    ChatMessages,
    GeminiApiKey,
}

impl StorageKey {
    /// Slot name on disk. Kept identical to the names the mobile app wrote.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Medications => "medications",
            StorageKey::Symptoms => "symptoms",
            StorageKey::ChatMessages => "chatMessages",
            StorageKey::GeminiApiKey => "geminiApiKey",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-agnostic durable storage.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Returns `None` when the slot has never been written or was removed.
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    async fn remove_item(&self, key: StorageKey) -> Result<(), StorageError>;
}
