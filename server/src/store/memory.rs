use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, ListQuery, StoreError};
use crate::models::{Event, NewEvent};

/// In-process store. Iteration order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Option<Event>
    where
        F: FnOnce(&mut Event),
    {
        let mut events = self.events.write().await;
        let event = events.iter_mut().find(|e| e.id == id)?;
        apply(event);
        Some(event.clone())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn list(&self, query: ListQuery) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| query.filter.matches(e))
            .cloned()
            .collect();

        // Stable sort keeps insertion order for equal dates.
        if query.by_date {
            events.sort_by(|a, b| a.event_date.cmp(&b.event_date));
        }
        Ok(events)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let created = event.into_event(Uuid::new_v4());
        self.events.write().await.push(created.clone());
        tracing::info!(id = %created.id, title = %created.title, "Created event");
        Ok(created)
    }

    async fn set_archived(&self, id: Uuid, archived: bool) -> Result<Option<Event>, StoreError> {
        Ok(self.update(id, |e| e.is_archived = archived).await)
    }

    async fn toggle_favorite(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.update(id, |e| e.is_favorite = !e.is_favorite).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }
}
