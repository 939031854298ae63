use std::sync::Arc;

use healthmate::db::create_pool;
use healthmate::models::{FoodTiming, MedicationType, NewChatMessage, NewMedication, TimeOfDay};
use healthmate::storage::SqliteStorage;
use healthmate::store::HealthStore;
use healthmate::symptoms::{record, SymptomForm};

async fn open_at(url: &str) -> HealthStore {
    let pool = create_pool(url).await.unwrap();
    HealthStore::open(Arc::new(SqliteStorage::new(pool))).await
}

#[tokio::test]
async fn test_state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("healthmate.db").display());

    let before = {
        let store = open_at(&url).await;
        let med = store.add_medication(NewMedication {
            name: "Metformin".to_string(),
            strength: 850.0,
            quantity: 1.0,
            medication_type: MedicationType::Pill,
            food_timing: FoodTiming::With,
            time_of_day: TimeOfDay::Evening,
        });
        store.toggle_medication_taken(&med.id);

        let mut form = SymptomForm::preset("Shortness of Breath");
        form.description = "after climbing stairs".to_string();
        let symptom = record(&store, &form).unwrap();
        store.escalate_symptom(&symptom.id).unwrap();

        store.add_chat_message(NewChatMessage::user("Should I worry?"));
        store.set_gemini_api_key("AIza-restart");
        store.flush().await;
        store.snapshot()
    };

    let reopened = open_at(&url).await;
    assert_eq!(reopened.snapshot(), before);
    assert!(reopened.symptoms()[0].is_emergency);
}

#[tokio::test]
async fn test_cleared_key_stays_cleared_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("healthmate.db").display());

    {
        let store = open_at(&url).await;
        store.set_gemini_api_key("AIza-temp");
        store.set_gemini_api_key("");
        store.flush().await;
    }

    let reopened = open_at(&url).await;
    assert_eq!(reopened.gemini_api_key(), None);
}
