//! Single source of truth for medications, symptoms, chat history and the
//! assistant credential.
//!
//! Reads come from memory. Every mutation updates memory, queues a write of
//! the whole affected collection, and notifies subscribers. Mutators never
//! wait for the write; call [`HealthStore::flush`] when durability matters.

mod persister;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::models::{
    new_id, now_local, ChatMessage, Medication, NewChatMessage, NewMedication, NewSymptom,
    Symptom,
};
use crate::storage::{KeyValueStorage, StorageError, StorageKey};
use persister::Persister;

const EVENT_CAPACITY: usize = 64;

/// In-memory contents of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub medications: Vec<Medication>,
    pub symptoms: Vec<Symptom>,
    pub chat_messages: Vec<ChatMessage>,
    pub gemini_api_key: Option<String>,
}

/// Which part of the store a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    MedicationsChanged,
    SymptomsChanged,
    ChatMessagesChanged,
    ApiKeyChanged,
}

#[derive(Clone)]
pub struct HealthStore {
    state: Arc<RwLock<StoreState>>,
    persister: Persister,
    events: broadcast::Sender<StoreEvent>,
}

impl HealthStore {
    /// Rehydrates from `storage` and starts the background writer.
    /// Must be called from within a Tokio runtime. Never fails: unreadable
    /// slots fall back to their defaults.
    pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let state = hydrate(storage.as_ref()).await;
        info!(
            "Store initialized: {} medications, {} symptoms, {} chat messages, api key {}",
            state.medications.len(),
            state.symptoms.len(),
            state.chat_messages.len(),
            if state.gemini_api_key.is_some() { "set" } else { "unset" }
        );
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(state)),
            persister: Persister::spawn(storage),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Waits until every write queued so far has reached storage.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    pub fn medications(&self) -> Vec<Medication> {
        self.read().medications.clone()
    }

    pub fn symptoms(&self) -> Vec<Symptom> {
        self.read().symptoms.clone()
    }

    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.read().chat_messages.clone()
    }

    pub fn gemini_api_key(&self) -> Option<String> {
        self.read().gemini_api_key.clone()
    }

    /// Appends a medication with a fresh id and `taken = false`.
    /// Fields are stored as given; validation belongs to the caller.
    pub fn add_medication(&self, fields: NewMedication) -> Medication {
        let medication = Medication::from_new(new_id(), fields);
        {
            let mut state = self.write();
            state.medications.push(medication.clone());
            self.persist(StorageKey::Medications, &state.medications);
        }
        debug!("Added medication {} ({})", medication.id, medication.name);
        self.notify(StoreEvent::MedicationsChanged);
        medication
    }

    /// Flips `taken` and returns the new value, or `None` when no medication
    /// has this id (nothing changes in that case).
    pub fn toggle_medication_taken(&self, id: &str) -> Option<bool> {
        let taken = {
            let mut state = self.write();
            let medication = state.medications.iter_mut().find(|m| m.id == id)?;
            medication.taken = !medication.taken;
            let taken = medication.taken;
            self.persist(StorageKey::Medications, &state.medications);
            taken
        };
        self.notify(StoreEvent::MedicationsChanged);
        Some(taken)
    }

    /// Appends a symptom stamped with the current local time.
    pub fn add_symptom(&self, fields: NewSymptom) -> Symptom {
        let symptom = Symptom::from_new(new_id(), now_local(), fields);
        {
            let mut state = self.write();
            state.symptoms.push(symptom.clone());
            self.persist(StorageKey::Symptoms, &state.symptoms);
        }
        self.notify(StoreEvent::SymptomsChanged);
        symptom
    }

    /// Returns whether a symptom was removed.
    pub fn remove_symptom(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.write();
            let before = state.symptoms.len();
            state.symptoms.retain(|s| s.id != id);
            let removed = state.symptoms.len() != before;
            if removed {
                self.persist(StorageKey::Symptoms, &state.symptoms);
            }
            removed
        };
        if removed {
            self.notify(StoreEvent::SymptomsChanged);
        }
        removed
    }

    /// Replaces a symptom with an emergency copy carrying a new id and
    /// timestamp. The copy goes to the end of the list.
    pub fn escalate_symptom(&self, id: &str) -> Option<Symptom> {
        let escalated = {
            let mut state = self.write();
            let index = state.symptoms.iter().position(|s| s.id == id)?;
            let original = state.symptoms.remove(index);
            let escalated = Symptom::from_new(new_id(), now_local(), original.escalated());
            state.symptoms.push(escalated.clone());
            self.persist(StorageKey::Symptoms, &state.symptoms);
            escalated
        };
        warn!("Symptom '{}' escalated to emergency", escalated.name);
        self.notify(StoreEvent::SymptomsChanged);
        Some(escalated)
    }

    pub fn add_chat_message(&self, fields: NewChatMessage) -> ChatMessage {
        let message = ChatMessage::from_new(new_id(), now_local(), fields);
        {
            let mut state = self.write();
            state.chat_messages.push(message.clone());
            self.persist(StorageKey::ChatMessages, &state.chat_messages);
        }
        self.notify(StoreEvent::ChatMessagesChanged);
        message
    }

    pub fn clear_chat_messages(&self) {
        {
            let mut state = self.write();
            state.chat_messages.clear();
            self.persist(StorageKey::ChatMessages, &state.chat_messages);
        }
        self.notify(StoreEvent::ChatMessagesChanged);
    }

    /// Stores the credential; an empty key clears it.
    pub fn set_gemini_api_key(&self, key: &str) {
        {
            let mut state = self.write();
            if key.is_empty() {
                state.gemini_api_key = None;
                self.persister.enqueue(StorageKey::GeminiApiKey, None);
            } else {
                state.gemini_api_key = Some(key.to_string());
                self.persister
                    .enqueue(StorageKey::GeminiApiKey, Some(key.to_string()));
            }
        }
        info!(
            "Gemini API key {}",
            if key.is_empty() { "cleared" } else { "updated" }
        );
        self.notify(StoreEvent::ApiKeyChanged);
    }

    // Called with the write lock held so queue order matches mutation order.
    fn persist<T: Serialize>(&self, key: StorageKey, items: &[T]) {
        match serde_json::to_string(items) {
            Ok(json) => self.persister.enqueue(key, Some(json)),
            Err(e) => error!("Failed to serialize slot '{key}': {e}"),
        }
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reads all four slots concurrently. Each slot falls back to its default
/// independently when missing, unreadable or unparsable.
async fn hydrate(storage: &dyn KeyValueStorage) -> StoreState {
    let (medications, symptoms, chat_messages, api_key) = tokio::join!(
        storage.get_item(StorageKey::Medications),
        storage.get_item(StorageKey::Symptoms),
        storage.get_item(StorageKey::ChatMessages),
        storage.get_item(StorageKey::GeminiApiKey),
    );

    let gemini_api_key = match api_key {
        Ok(Some(key)) if !key.is_empty() => Some(key),
        Ok(_) => None,
        Err(e) => {
            error!("Error reading slot '{}': {e}", StorageKey::GeminiApiKey);
            None
        }
    };

    StoreState {
        medications: load_collection(StorageKey::Medications, medications),
        symptoms: load_collection(StorageKey::Symptoms, symptoms),
        chat_messages: load_collection(StorageKey::ChatMessages, chat_messages),
        gemini_api_key,
    }
}

fn load_collection<T: DeserializeOwned>(
    key: StorageKey,
    read: Result<Option<String>, StorageError>,
) -> Vec<T> {
    match read {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            error!("Error parsing slot '{key}', starting empty: {e}");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            error!("Error reading slot '{key}', starting empty: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::symptom::{DEFAULT_SEVERITY, EMERGENCY_SEVERITY};
    use crate::models::{ChatRole, FoodTiming, MedicationType, TimeOfDay};
    use crate::storage::InMemoryStorage;

    fn amoxicillin() -> NewMedication {
        NewMedication {
            name: "Amoxicillin".to_string(),
            strength: 500.0,
            quantity: 1.0,
            medication_type: MedicationType::Pill,
            food_timing: FoodTiming::After,
            time_of_day: TimeOfDay::Morning,
        }
    }

    fn headache() -> NewSymptom {
        NewSymptom {
            name: "Headache".to_string(),
            description: "since noon".to_string(),
            severity: DEFAULT_SEVERITY,
            is_emergency: false,
        }
    }

    async fn open_empty() -> (Arc<InMemoryStorage>, HealthStore) {
        let storage = Arc::new(InMemoryStorage::new());
        let store = HealthStore::open(storage.clone()).await;
        (storage, store)
    }

    #[tokio::test]
    async fn test_add_medication_assigns_distinct_ids_untaken() {
        let (_, store) = open_empty().await;
        for _ in 0..25 {
            store.add_medication(amoxicillin());
        }
        let meds = store.medications();
        assert_eq!(meds.len(), 25);
        assert!(meds.iter().all(|m| !m.taken));
        let ids: HashSet<_> = meds.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 25);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_taken() {
        let (_, store) = open_empty().await;
        let med = store.add_medication(amoxicillin());
        assert_eq!(med.time_of_day, TimeOfDay::Morning);
        assert!(!med.taken);

        assert_eq!(store.toggle_medication_taken(&med.id), Some(true));
        assert!(store.medications()[0].taken);
        assert_eq!(store.toggle_medication_taken(&med.id), Some(false));
        assert!(!store.medications()[0].taken);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_noop() {
        let (_, store) = open_empty().await;
        store.add_medication(amoxicillin());
        let before = store.medications();
        assert_eq!(store.toggle_medication_taken("missing"), None);
        assert_eq!(store.medications(), before);
    }

    #[tokio::test]
    async fn test_add_then_remove_symptom_restores_collection() {
        let (_, store) = open_empty().await;
        store.add_symptom(headache());
        let before = store.symptoms();

        let added = store.add_symptom(NewSymptom {
            name: "Cough".to_string(),
            ..headache()
        });
        assert!(store.remove_symptom(&added.id));
        assert_eq!(store.symptoms(), before);
        assert!(!store.remove_symptom(&added.id));
    }

    #[tokio::test]
    async fn test_escalate_replaces_with_emergency_copy() {
        let (_, store) = open_empty().await;
        let original = store.add_symptom(headache());
        let other = store.add_symptom(NewSymptom {
            name: "Fever".to_string(),
            ..headache()
        });

        let escalated = store.escalate_symptom(&original.id).unwrap();
        assert_ne!(escalated.id, original.id);
        assert!(escalated.is_emergency);
        assert_eq!(escalated.severity, EMERGENCY_SEVERITY);
        assert_eq!(escalated.name, "Headache");

        let symptoms = store.symptoms();
        assert_eq!(symptoms.len(), 2);
        assert_eq!(symptoms[0].id, other.id);
        assert_eq!(symptoms[1].id, escalated.id);
        assert!(store.escalate_symptom(&original.id).is_none());
    }

    #[tokio::test]
    async fn test_chat_messages_keep_order_and_clear() {
        let (storage, store) = open_empty().await;
        store.add_chat_message(NewChatMessage::user("hello"));
        store.add_chat_message(NewChatMessage::assistant("hi there"));
        let messages = store.chat_messages();
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].content, "hi there");

        store.clear_chat_messages();
        store.flush().await;
        assert!(store.chat_messages().is_empty());
        assert_eq!(storage.raw(StorageKey::ChatMessages).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_empty_api_key_clears_slot() {
        let (storage, store) = open_empty().await;
        store.set_gemini_api_key("AIza-test");
        store.flush().await;
        assert_eq!(storage.raw(StorageKey::GeminiApiKey).as_deref(), Some("AIza-test"));

        store.set_gemini_api_key("");
        store.flush().await;
        assert_eq!(store.gemini_api_key(), None);
        assert_eq!(storage.raw(StorageKey::GeminiApiKey), None);
    }

    #[tokio::test]
    async fn test_reopen_restores_everything() {
        let (storage, store) = open_empty().await;
        let med = store.add_medication(amoxicillin());
        store.toggle_medication_taken(&med.id);
        store.add_symptom(headache());
        store.add_chat_message(NewChatMessage::user("is ibuprofen ok with food?"));
        store.set_gemini_api_key("AIza-test");
        store.flush().await;
        let before = store.snapshot();
        drop(store);

        let reopened = HealthStore::open(storage).await;
        assert_eq!(reopened.snapshot(), before);
    }

    #[tokio::test]
    async fn test_corrupt_slot_falls_back_alone() {
        let storage = Arc::new(
            InMemoryStorage::new()
                .with_item(StorageKey::Medications, "{not json")
                .with_item(StorageKey::GeminiApiKey, "AIza-kept"),
        );
        let store = HealthStore::open(storage).await;
        assert!(store.medications().is_empty());
        assert_eq!(store.gemini_api_key().as_deref(), Some("AIza-kept"));
    }

    #[tokio::test]
    async fn test_unreadable_storage_starts_with_defaults() {
        let storage = Arc::new(InMemoryStorage::new().with_item(StorageKey::Symptoms, "[]"));
        storage.set_offline(true);
        let store = HealthStore::open(storage).await;
        assert_eq!(store.snapshot(), StoreState::default());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let (storage, store) = open_empty().await;
        storage.set_offline(true);
        store.add_medication(amoxicillin());
        store.flush().await;
        assert_eq!(store.medications().len(), 1);
        assert_eq!(storage.raw(StorageKey::Medications), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let (_, store) = open_empty().await;
        let mut events = store.subscribe();
        let med = store.add_medication(amoxicillin());
        store.toggle_medication_taken("missing");
        store.toggle_medication_taken(&med.id);
        store.set_gemini_api_key("k");

        assert_eq!(events.recv().await.unwrap(), StoreEvent::MedicationsChanged);
        assert_eq!(events.recv().await.unwrap(), StoreEvent::MedicationsChanged);
        assert_eq!(events.recv().await.unwrap(), StoreEvent::ApiKeyChanged);
    }
}
