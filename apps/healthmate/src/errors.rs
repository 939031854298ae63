use thiserror::Error;

use crate::llm_client::ChatError;

/// Error type returned by the screen controllers.
/// Every variant maps to a message that can be shown to the user as-is.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No Gemini API key is set")]
    MissingApiKey,

    #[error("Phone dialer unavailable for {0}")]
    DialerUnavailable(String),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::MissingApiKey => {
                "Please set your Gemini API key before starting a chat.".to_string()
            }
            AppError::DialerUnavailable(_) => {
                "Unable to place a phone call from this device.".to_string()
            }
            AppError::Chat(e) => e.user_message().to_string(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
