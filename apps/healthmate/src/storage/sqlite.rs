use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::{KeyValueStorage, StorageError, StorageKey};

/// Slot storage backed by a single `kv_store` table.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Wraps a pool whose schema was prepared by [`crate::db::create_pool`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_item(&self, key: StorageKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    #[tokio::test]
    async fn test_upsert_overwrites_slot() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("kv.db").display());
        let storage = SqliteStorage::new(create_pool(&url).await.unwrap());

        storage.set_item(StorageKey::GeminiApiKey, "first").await.unwrap();
        storage.set_item(StorageKey::GeminiApiKey, "second").await.unwrap();
        assert_eq!(
            storage.get_item(StorageKey::GeminiApiKey).await.unwrap().as_deref(),
            Some("second")
        );

        storage.remove_item(StorageKey::GeminiApiKey).await.unwrap();
        assert_eq!(storage.get_item(StorageKey::GeminiApiKey).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("kv.db").display());
        let storage = SqliteStorage::new(create_pool(&url).await.unwrap());

        storage.set_item(StorageKey::Medications, "[1]").await.unwrap();
        storage.set_item(StorageKey::Symptoms, "[2]").await.unwrap();
        assert_eq!(
            storage.get_item(StorageKey::Medications).await.unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(storage.get_item(StorageKey::ChatMessages).await.unwrap(), None);
    }
}
