//! Medication screen logic: the add form and the daily schedule.

use crate::errors::AppError;
use crate::models::{FoodTiming, Medication, MedicationType, NewMedication, TimeOfDay};
use crate::store::HealthStore;

/// Raw add-medication form input. Numeric fields arrive as typed text.
#[derive(Debug, Clone, Default)]
pub struct MedicationForm {
    pub medication_type: Option<MedicationType>,
    pub name: String,
    pub quantity: String,
    pub strength: String,
    pub food_timing: Option<FoodTiming>,
    pub time_of_day: Option<TimeOfDay>,
}

impl MedicationForm {
    /// Whether every field has a value. Drives the save button.
    pub fn is_complete(&self) -> bool {
        self.medication_type.is_some()
            && !self.name.trim().is_empty()
            && !self.quantity.trim().is_empty()
            && !self.strength.trim().is_empty()
            && self.food_timing.is_some()
            && self.time_of_day.is_some()
    }

    pub fn validate(&self) -> Result<NewMedication, AppError> {
        let medication_type = self
            .medication_type
            .ok_or_else(|| missing("Medication type"))?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(missing("Name"));
        }
        let quantity = parse_amount("Quantity", &self.quantity)?;
        let strength = parse_amount("Strength", &self.strength)?;
        let food_timing = self.food_timing.ok_or_else(|| missing("Food timing"))?;
        let time_of_day = self.time_of_day.ok_or_else(|| missing("Time of day"))?;

        Ok(NewMedication {
            name: name.to_string(),
            strength,
            quantity,
            medication_type,
            food_timing,
            time_of_day,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{field} is required"))
}

fn parse_amount(field: &str, raw: &str) -> Result<f64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(missing(field));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(AppError::Validation(format!(
            "{field} must be a positive number"
        ))),
    }
}

/// Validates the form and adds the medication to the store.
pub fn save(store: &HealthStore, form: &MedicationForm) -> Result<Medication, AppError> {
    let fields = form.validate()?;
    Ok(store.add_medication(fields))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSlot {
    pub time_of_day: TimeOfDay,
    pub medications: Vec<Medication>,
}

/// Today's pending doses, one slot per bucket in display order.
/// Empty buckets are kept so every slot can be rendered.
pub fn schedule(medications: &[Medication]) -> Vec<ScheduleSlot> {
    TimeOfDay::ALL
        .iter()
        .map(|&time_of_day| ScheduleSlot {
            time_of_day,
            medications: due_now(medications, time_of_day),
        })
        .collect()
}

/// Pending (not yet taken) medications for one bucket, in insertion order.
pub fn due_now(medications: &[Medication], time_of_day: TimeOfDay) -> Vec<Medication> {
    medications
        .iter()
        .filter(|m| m.time_of_day == time_of_day && !m.taken)
        .cloned()
        .collect()
}

/// One-line summary, e.g. "500mg • 1 pills • after food".
pub fn describe(medication: &Medication) -> String {
    format!(
        "{}mg • {}{} • {} food",
        medication.strength,
        medication.quantity,
        medication.medication_type.quantity_unit(),
        medication.food_timing.as_str()
    )
}
