use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

use crate::errors::AppError;

pub const DEFAULT_EMERGENCY_NUMBER: &str = "80011111";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
}

/// Host phone dialer.
#[async_trait]
pub trait EmergencyDialer: Send + Sync {
    /// Whether the device can handle this URI at all.
    async fn can_open(&self, uri: &str) -> bool;

    async fn open(&self, uri: &str) -> Result<()>;
}

/// `tel:` on Android, `telprompt:` on iOS so the user confirms the call.
pub fn dial_uri(platform: Platform, number: &str) -> String {
    match platform {
        Platform::Android => format!("tel:{number}"),
        Platform::Ios => format!("telprompt:{number}"),
    }
}

/// Opens the dialer for `number`. Returns the URI that was opened.
pub async fn call_emergency(
    dialer: &dyn EmergencyDialer,
    platform: Platform,
    number: &str,
) -> Result<String, AppError> {
    let uri = dial_uri(platform, number);
    if !dialer.can_open(&uri).await {
        error!("Cannot make phone call: no handler for {uri}");
        return Err(AppError::DialerUnavailable(uri));
    }
    dialer.open(&uri).await?;
    info!("Emergency call placed to {number}");
    Ok(uri)
}
