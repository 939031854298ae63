use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthmate::config::Config;
use healthmate::home::Dashboard;
use healthmate::medications::describe;
use healthmate::models::now_local;
use healthmate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HealthMate v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::init(config).await?;
    info!(
        "Chat model: {} ({})",
        healthmate::llm_client::MODEL,
        if state.store.gemini_api_key().is_some() {
            "API key set"
        } else {
            "no API key"
        }
    );

    let dashboard = Dashboard::build(&state, now_local());
    info!(
        "{} schedule: {} dose(s) pending",
        dashboard.time_of_day.as_str(),
        dashboard.due_medications.len()
    );
    for medication in &dashboard.due_medications {
        info!("  {} - {}", medication.name, describe(medication));
    }
    for symptom in &dashboard.recent_symptoms {
        info!(
            "  symptom: {} (severity {}{})",
            symptom.name,
            symptom.severity,
            if symptom.is_emergency { ", emergency" } else { "" }
        );
    }
    info!("Emergency assistance: call {}", dashboard.emergency_number);

    state.store.flush().await;
    Ok(())
}
