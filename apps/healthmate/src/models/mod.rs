pub mod chat;
pub mod medication;
pub mod symptom;

pub use chat::{ChatMessage, ChatRole, NewChatMessage};
pub use medication::{FoodTiming, Medication, MedicationType, NewMedication, TimeOfDay};
pub use symptom::{NewSymptom, Symptom};

use chrono::{Local, NaiveDateTime, Timelike};

/// Wall-clock format used for every persisted timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current local time truncated to whole seconds, matching what survives a
/// round trip through [`TIMESTAMP_FORMAT`].
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Serde adapter for [`TIMESTAMP_FORMAT`] timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
