//! Chat screen logic.
//!
//! The session owns the transient screen state (started, loading, error
//! banner). History lives in the store. The gateway never touches history;
//! the session records every turn, including a placeholder reply on failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{ChatError, ChatModel};
use crate::models::{ChatMessage, NewChatMessage};
use crate::state::AppState;
use crate::store::HealthStore;

/// Assistant turn recorded when a request fails.
pub const ERROR_PLACEHOLDER: &str =
    "I apologize, but I encountered an error. Please try again later.";

pub struct ChatSession {
    store: HealthStore,
    model: Arc<dyn ChatModel>,
    started: AtomicBool,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl ChatSession {
    pub fn new(state: &AppState) -> Self {
        Self::with_model(state.store.clone(), state.chat_model.clone())
    }

    pub fn with_model(store: HealthStore, model: Arc<dyn ChatModel>) -> Self {
        Self {
            store,
            model,
            started: AtomicBool::new(false),
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Current error banner text, if any.
    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_api_key(&self) -> bool {
        self.store.gemini_api_key().is_some()
    }

    /// Opens the conversation. Requires a stored API key.
    pub fn start(&self) -> Result<(), AppError> {
        if !self.has_api_key() {
            return Err(AppError::MissingApiKey);
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Saves a trimmed key. Blank input is ignored and returns false.
    pub fn save_api_key(&self, input: &str) -> bool {
        let key = input.trim();
        if key.is_empty() {
            return false;
        }
        self.store.set_gemini_api_key(key);
        self.set_error(None);
        true
    }

    /// Forgets the stored key and closes the conversation.
    pub fn remove_api_key(&self) {
        self.store.set_gemini_api_key("");
        self.started.store(false, Ordering::SeqCst);
    }

    /// Closes the conversation and clears its history.
    pub fn end(&self) {
        self.started.store(false, Ordering::SeqCst);
        self.store.clear_chat_messages();
        info!("Chat session ended");
    }

    /// Sends one message and records both turns.
    ///
    /// Returns the recorded assistant turn, or `None` for blank input.
    /// On failure the banner holds the error's user message and the recorded
    /// turn is [`ERROR_PLACEHOLDER`].
    pub async fn send(&self, input: &str) -> Option<ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.set_error(None);
        self.store.add_chat_message(NewChatMessage::user(text));

        self.loading.store(true, Ordering::SeqCst);
        let result = match self.store.gemini_api_key() {
            Some(key) => self.model.chat(&key, text).await,
            None => Err(ChatError::MissingCredential),
        };
        self.loading.store(false, Ordering::SeqCst);

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat request failed: {e}");
                self.set_error(Some(e.user_message().to_string()));
                ERROR_PLACEHOLDER.to_string()
            }
        };
        Some(self.store.add_chat_message(NewChatMessage::assistant(reply)))
    }

    fn set_error(&self, value: Option<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}
