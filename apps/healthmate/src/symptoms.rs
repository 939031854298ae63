//! Symptom screen logic: preset catalog, the record form and escalation.

use crate::errors::AppError;
use crate::models::symptom::{DEFAULT_SEVERITY, EMERGENCY_SEVERITY};
use crate::models::{NewSymptom, Symptom};
use crate::store::HealthStore;

/// Common symptoms offered as one-tap choices.
pub const PRESET_SYMPTOMS: [&str; 9] = [
    "Headache",
    "Fever",
    "Cough",
    "Fatigue",
    "Nausea",
    "Dizziness",
    "Chest Pain",
    "Shortness of Breath",
    "Back Pain",
];

#[derive(Debug, Clone, PartialEq)]
pub enum SymptomChoice {
    Preset(&'static str),
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomForm {
    pub choice: SymptomChoice,
    pub description: String,
    pub is_emergency: bool,
}

impl SymptomForm {
    pub fn preset(name: &'static str) -> Self {
        Self {
            choice: SymptomChoice::Preset(name),
            description: String::new(),
            is_emergency: false,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            choice: SymptomChoice::Custom(name.into()),
            description: String::new(),
            is_emergency: false,
        }
    }

    /// Emergency entries are recorded at the top severity.
    pub fn validate(&self) -> Result<NewSymptom, AppError> {
        let name = match &self.choice {
            SymptomChoice::Preset(name) => name.to_string(),
            SymptomChoice::Custom(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AppError::Validation("Symptom name is required".to_string()));
                }
                name.to_string()
            }
        };

        Ok(NewSymptom {
            name,
            description: self.description.trim().to_string(),
            severity: if self.is_emergency {
                EMERGENCY_SEVERITY
            } else {
                DEFAULT_SEVERITY
            },
            is_emergency: self.is_emergency,
        })
    }
}

pub fn record(store: &HealthStore, form: &SymptomForm) -> Result<Symptom, AppError> {
    let fields = form.validate()?;
    Ok(store.add_symptom(fields))
}

/// The `limit` most recently recorded symptoms, newest first.
pub fn recent(symptoms: &[Symptom], limit: usize) -> Vec<Symptom> {
    symptoms.iter().rev().take(limit).cloned().collect()
}
