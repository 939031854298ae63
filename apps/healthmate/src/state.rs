use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{ChatModel, GeminiClient};
use crate::storage::{KeyValueStorage, SqliteStorage};
use crate::store::HealthStore;

/// Application root. Built once at startup and handed to every controller.
#[derive(Clone)]
pub struct AppState {
    pub store: HealthStore,
    /// Pluggable chat backend. Default: GeminiClient.
    pub chat_model: Arc<dyn ChatModel>,
    pub config: Config,
}

impl AppState {
    /// Opens SQLite storage, rehydrates the store and builds the Gemini client.
    pub async fn init(config: Config) -> Result<Self> {
        let pool = create_pool(&config.database_url).await?;
        let storage: Arc<dyn KeyValueStorage> = Arc::new(SqliteStorage::new(pool));
        let chat_model = Arc::new(GeminiClient::new(
            config.gemini_base_url.clone(),
            config.gemini_timeout,
        )?);
        Ok(Self::with_parts(storage, chat_model, config).await)
    }

    pub async fn with_parts(
        storage: Arc<dyn KeyValueStorage>,
        chat_model: Arc<dyn ChatModel>,
        config: Config,
    ) -> Self {
        Self {
            store: HealthStore::open(storage).await,
            chat_model,
            config,
        }
    }
}
