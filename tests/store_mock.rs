use planbot::components::planning::diff::diff;
use planbot::components::planning::models::ScheduleEvent;
use planbot::error::{store_error, BotResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock implementation of the snapshot store for testing without Redis.
/// Uses the same JSON-in-a-single-key layout as the real store, so a
/// replacement is one atomic map insert.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the stored snapshot; empty when nothing is stored yet
    pub async fn load_courses(&self) -> BotResult<Vec<ScheduleEvent>> {
        let data = self.data.lock().await;

        if let Some(json) = data.get("planning:courses") {
            serde_json::from_str(json)
                .map_err(|e| store_error(&format!("Failed to deserialize courses: {e}")))
        } else {
            Ok(Vec::new())
        }
    }

    /// Replace the stored snapshot wholesale
    pub async fn replace_courses(&self, courses: Vec<ScheduleEvent>) -> BotResult<()> {
        let json = serde_json::to_string(&courses)
            .map_err(|e| store_error(&format!("Failed to serialize courses: {e}")))?;
        let mut data = self.data.lock().await;
        data.insert("planning:courses".to_string(), json);
        Ok(())
    }
}

fn event(title: &str) -> ScheduleEvent {
    ScheduleEvent {
        title: title.to_string(),
        start_date: "01/09/2025".to_string(),
        start_time: "09:00:00".to_string(),
        end_date: "01/09/2025".to_string(),
        end_time: "12:00:00".to_string(),
        professor: "M. Dupont".to_string(),
        location: "CHALON SUR SAONE".to_string(),
        room: "B204".to_string(),
        description: String::new(),
    }
}

/// An uninitialized store yields an empty snapshot, not an error
#[tokio::test]
async fn test_empty_store_loads_empty() {
    let store = MockStore::new();
    let courses = store.load_courses().await.unwrap();
    assert!(courses.is_empty());
}

/// End-to-end: old [A, B], new [B, C] -> added {C}, removed {A}, and the
/// store afterwards contains exactly the new snapshot (set equality)
#[tokio::test]
async fn test_update_cycle_against_store() {
    let store = MockStore::new();

    let event_a = event("EventA");
    let event_b = event("EventB");
    let event_c = event("EventC");

    store
        .replace_courses(vec![event_a.clone(), event_b.clone()])
        .await
        .unwrap();

    // One update cycle: load old, diff, persist new
    let new_snapshot = vec![event_b.clone(), event_c.clone()];
    let old_snapshot = store.load_courses().await.unwrap();
    let changes = diff(&old_snapshot, &new_snapshot);
    store.replace_courses(new_snapshot).await.unwrap();

    assert_eq!(changes.added, vec![event_c.clone()]);
    assert_eq!(changes.removed, vec![event_a.clone()]);

    let stored: HashSet<ScheduleEvent> = store.load_courses().await.unwrap().into_iter().collect();
    let expected: HashSet<ScheduleEvent> = [event_b, event_c].into_iter().collect();
    assert_eq!(stored, expected);
}

/// A failed scrape must leave the old snapshot fully intact: the cycle
/// errors out before any replacement happens
#[tokio::test]
async fn test_failed_scrape_preserves_snapshot() {
    let store = MockStore::new();

    let old = vec![event("EventA"), event("EventB")];
    store.replace_courses(old.clone()).await.unwrap();

    // Simulated cycle where the scrape step fails before the diff
    let scrape_result: BotResult<Vec<ScheduleEvent>> =
        Err(planbot::error::Error::ScrapeFailed("exit status 1".into()));

    if let Ok(new_snapshot) = scrape_result {
        let old_snapshot = store.load_courses().await.unwrap();
        let _ = diff(&old_snapshot, &new_snapshot);
        store.replace_courses(new_snapshot).await.unwrap();
    }

    assert_eq!(store.load_courses().await.unwrap(), old);
}
