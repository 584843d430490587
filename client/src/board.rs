//! View state for one page of events.
//!
//! The board holds a possibly stale copy of one collection. Mutations are sent
//! to the API and the snapshot is patched from the server's response rather
//! than re-fetched. A failed call leaves the snapshot as it was and records a
//! notice for the page to show.

use uuid::Uuid;

use eventify_server::models::{Event, SortOrder};
use eventify_server::utils::response::EventMessage;

use crate::client::EventClient;
use crate::collection::Collection;
use crate::views::{search, sort_by_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient on-screen message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub query: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone)]
pub struct EventBoard {
    collection: Collection,
    events: Vec<Event>,
    notice: Option<Notice>,
}

impl EventBoard {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            events: Vec::new(),
            notice: None,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn load(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    /// Patches the snapshot with an event returned by a mutation. Events that
    /// no longer belong to this page are dropped.
    pub fn apply_update(&mut self, event: Event) {
        if !self.collection.retains(&event) {
            self.events.retain(|e| e.id != event.id);
            return;
        }
        if let Some(slot) = self.events.iter_mut().find(|e| e.id == event.id) {
            *slot = event;
        }
    }

    pub fn apply(&mut self, outcome: EventMessage) {
        self.info(outcome.message);
        self.apply_update(outcome.event);
    }

    pub fn remove(&mut self, id: Uuid) {
        self.events.retain(|e| e.id != id);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        });
    }

    fn info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            message: message.into(),
        });
    }

    /// Sorted, then filtered by the search query.
    pub fn visible(&self, options: &ViewOptions) -> Vec<&Event> {
        search(sort_by_date(&self.events, options.order), &options.query)
    }

    pub async fn refresh(&mut self, client: &EventClient) {
        match client.list(self.collection).await {
            Ok(events) => self.load(events),
            Err(e) => {
                tracing::warn!(error = %e, collection = ?self.collection, "Failed to load events");
                self.fail("Failed to load events.");
            }
        }
    }

    pub async fn toggle_favorite(&mut self, client: &EventClient, id: Uuid) {
        match client.toggle_favorite(id).await {
            Ok(outcome) => self.apply(outcome),
            Err(_) => self.fail("Failed to update favorite status."),
        }
    }

    pub async fn set_archived(&mut self, client: &EventClient, id: Uuid, archived: bool) {
        match client.set_archived(id, archived).await {
            Ok(outcome) => self.apply(outcome),
            Err(_) => self.fail("Failed to update archive status."),
        }
    }

    pub async fn delete(&mut self, client: &EventClient, id: Uuid) {
        match client.delete(id).await {
            Ok(message) => {
                self.remove(id);
                self.info(message);
            }
            Err(_) => self.fail("Failed to delete event."),
        }
    }
}
