//! Event Store access layer.
//!
//! Every operation is a single awaited call against the backing store with no
//! retry. Missing documents are reported as `None`/`false`; the HTTP layer
//! turns those into 404s.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Event, NewEvent};

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

/// Connection string that selects the in-process store.
pub const MEMORY_STORE_URL: &str = "memory://";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    All,
    Archived,
    Favorites,
    /// Events whose `event_date` is on or after the given day.
    UpcomingFrom(NaiveDate),
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Archived => event.is_archived,
            EventFilter::Favorites => event.is_favorite,
            EventFilter::UpcomingFrom(day) => event.event_date >= *day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: EventFilter,
    /// Ascending by `event_date` when set; otherwise store iteration
    /// (creation) order. Descending views are computed client side.
    pub by_date: bool,
}

impl ListQuery {
    pub fn new(filter: EventFilter) -> Self {
        Self {
            filter,
            by_date: false,
        }
    }

    pub fn sorted_by_date(mut self) -> Self {
        self.by_date = true;
        self
    }
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self, query: ListQuery) -> Result<Vec<Event>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    async fn create(&self, event: NewEvent) -> Result<Event, StoreError>;

    async fn set_archived(&self, id: Uuid, archived: bool) -> Result<Option<Event>, StoreError>;

    async fn toggle_favorite(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Releases the underlying connections. Called once at shutdown.
    async fn close(&self) {}
}

/// Builds the store selected by `DATABASE_URL`.
pub async fn connect(config: &Config) -> Result<Arc<dyn EventStore>, StoreError> {
    if config.database_url == MEMORY_STORE_URL {
        tracing::warn!("Using in-memory event store; data is lost on shutdown");
        return Ok(Arc::new(MemoryEventStore::new()));
    }

    let store = PgEventStore::connect(&config.database_url, config.max_connections).await?;
    tracing::info!("Successfully connected to database");

    store.migrate().await?;
    tracing::info!("Migrations run successfully");

    Ok(Arc::new(store))
}
