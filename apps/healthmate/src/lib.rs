//! HealthMate core: medication and symptom tracking with a health-assistant chat.
//!
//! Screens render from [`store::HealthStore`] and call into the controller
//! modules (`medications`, `symptoms`, `chat`, `emergency`, `home`). The
//! application root, [`state::AppState`], is built once and passed down.

pub mod chat;
pub mod config;
pub mod db;
pub mod emergency;
pub mod errors;
pub mod home;
pub mod llm_client;
pub mod medications;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod symptoms;
