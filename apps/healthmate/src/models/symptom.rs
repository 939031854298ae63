use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Severity recorded for a symptom flagged as an emergency.
pub const EMERGENCY_SEVERITY: u8 = 5;
/// Severity recorded for an ordinary symptom.
pub const DEFAULT_SEVERITY: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: u8,
    pub is_emergency: bool,
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSymptom {
    pub name: String,
    pub description: String,
    pub severity: u8,
    pub is_emergency: bool,
}

impl Symptom {
    pub fn from_new(id: String, timestamp: NaiveDateTime, fields: NewSymptom) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            severity: fields.severity,
            is_emergency: fields.is_emergency,
            timestamp,
        }
    }

    /// Fields for re-recording this symptom as an emergency.
    pub fn escalated(&self) -> NewSymptom {
        NewSymptom {
            name: self.name.clone(),
            description: self.description.clone(),
            severity: EMERGENCY_SEVERITY,
            is_emergency: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_timestamp_format() {
        let ts = NaiveDateTime::parse_from_str("2024-03-01 08:15:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let symptom = Symptom::from_new(
            "s1".to_string(),
            ts,
            NewSymptom {
                name: "Fever".to_string(),
                description: "38.5C".to_string(),
                severity: DEFAULT_SEVERITY,
                is_emergency: false,
            },
        );
        let json = serde_json::to_value(&symptom).unwrap();
        assert_eq!(json["timestamp"], "2024-03-01 08:15:00");
        assert_eq!(json["isEmergency"], false);

        let back: Symptom = serde_json::from_value(json).unwrap();
        assert_eq!(back, symptom);
    }

    #[test]
    fn test_escalated_keeps_name_and_raises_severity() {
        let symptom = Symptom::from_new(
            "s1".to_string(),
            chrono::NaiveDateTime::default(),
            NewSymptom {
                name: "Chest Pain".to_string(),
                description: "left side".to_string(),
                severity: DEFAULT_SEVERITY,
                is_emergency: false,
            },
        );
        let escalated = symptom.escalated();
        assert_eq!(escalated.name, "Chest Pain");
        assert_eq!(escalated.description, "left side");
        assert_eq!(escalated.severity, EMERGENCY_SEVERITY);
        assert!(escalated.is_emergency);
    }
}
