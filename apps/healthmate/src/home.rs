use chrono::{NaiveDateTime, Timelike};

use crate::medications::due_now;
use crate::models::{Medication, Symptom, TimeOfDay};
use crate::state::AppState;
use crate::symptoms::recent;

const RECENT_SYMPTOM_LIMIT: usize = 3;

/// Home screen contents at a given moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub time_of_day: TimeOfDay,
    /// Pending doses for the current bucket.
    pub due_medications: Vec<Medication>,
    pub recent_symptoms: Vec<Symptom>,
    pub emergency_number: String,
}

impl Dashboard {
    pub fn build(state: &AppState, now: NaiveDateTime) -> Self {
        let snapshot = state.store.snapshot();
        let time_of_day = TimeOfDay::from_hour(now.hour());
        Self {
            time_of_day,
            due_medications: due_now(&snapshot.medications, time_of_day),
            recent_symptoms: recent(&snapshot.symptoms, RECENT_SYMPTOM_LIMIT),
            emergency_number: state.config.emergency_number.clone(),
        }
    }
}
