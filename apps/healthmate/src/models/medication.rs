use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MedicationType {
    Pill,
    Syrup,
}

impl MedicationType {
    /// Unit suffix appended to the quantity: "1 pills", "7.5ml".
    pub fn quantity_unit(&self) -> &'static str {
        match self {
            MedicationType::Pill => " pills",
            MedicationType::Syrup => "ml",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FoodTiming {
    Before,
    With,
    After,
}

impl FoodTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodTiming::Before => "before",
            FoodTiming::With => "with",
            FoodTiming::After => "after",
        }
    }
}

/// Schedule slot a medication is taken in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// All buckets in display order.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Maps a 24h clock hour onto its bucket.
    /// 05-11 Morning, 12-16 Afternoon, 17-20 Evening, anything else Night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    /// Strength in mg.
    pub strength: f64,
    pub quantity: f64,
    #[serde(rename = "type")]
    pub medication_type: MedicationType,
    pub food_timing: FoodTiming,
    pub time_of_day: TimeOfDay,
    pub taken: bool,
}

/// Caller-supplied fields for a new medication. The store assigns id and `taken`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub strength: f64,
    pub quantity: f64,
    pub medication_type: MedicationType,
    pub food_timing: FoodTiming,
    pub time_of_day: TimeOfDay,
}

impl Medication {
    pub fn from_new(id: String, fields: NewMedication) -> Self {
        Self {
            id,
            name: fields.name,
            strength: fields.strength,
            quantity: fields.quantity,
            medication_type: fields.medication_type,
            food_timing: fields.food_timing,
            time_of_day: fields.time_of_day,
            taken: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
    }

    #[test]
    fn test_medication_json_uses_app_field_names() {
        let med = Medication::from_new(
            "m1".to_string(),
            NewMedication {
                name: "Amoxicillin".to_string(),
                strength: 500.0,
                quantity: 1.0,
                medication_type: MedicationType::Pill,
                food_timing: FoodTiming::After,
                time_of_day: TimeOfDay::Morning,
            },
        );
        let json = serde_json::to_value(&med).unwrap();
        assert_eq!(json["type"], "pill");
        assert_eq!(json["foodTiming"], "after");
        assert_eq!(json["timeOfDay"], "Morning");
        assert_eq!(json["taken"], false);
    }
}
