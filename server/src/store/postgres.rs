use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{EventFilter, EventStore, ListQuery, StoreError};
use crate::models::{Event, NewEvent};

const EVENT_COLUMNS: &str = "id, title, description, event_date, time, location, organizer, \
     max_attendees, category, image_url, is_archived, is_favorite";

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

fn order_clause(by_date: bool) -> &'static str {
    if by_date {
        "ORDER BY event_date ASC, created_at ASC"
    } else {
        "ORDER BY created_at ASC"
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self, query: ListQuery) -> Result<Vec<Event>, StoreError> {
        let predicate = match query.filter {
            EventFilter::All => "TRUE",
            EventFilter::Archived => "is_archived",
            EventFilter::Favorites => "is_favorite",
            EventFilter::UpcomingFrom(_) => "event_date >= $1",
        };
        let sql = format!(
            "SELECT {} FROM events WHERE {} {}",
            EVENT_COLUMNS,
            predicate,
            order_clause(query.by_date)
        );

        let mut statement = sqlx::query_as::<_, Event>(&sql);
        if let EventFilter::UpcomingFrom(day) = query.filter {
            statement = statement.bind(day);
        }

        let events = statement.fetch_all(&self.pool).await?;
        tracing::debug!(filter = ?query.filter, count = events.len(), "Listed events");
        Ok(events)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let sql = format!(
            "INSERT INTO events (id, title, description, event_date, time, location, organizer, \
             max_attendees, category, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {}",
            EVENT_COLUMNS
        );
        let created = sqlx::query_as::<_, Event>(&sql)
            .bind(Uuid::new_v4())
            .bind(event.title)
            .bind(event.description)
            .bind(event.event_date)
            .bind(event.time)
            .bind(event.location)
            .bind(event.organizer)
            .bind(event.max_attendees)
            .bind(event.category)
            .bind(event.image_url)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(id = %created.id, title = %created.title, "Created event");
        Ok(created)
    }

    async fn set_archived(&self, id: Uuid, archived: bool) -> Result<Option<Event>, StoreError> {
        let sql = format!(
            "UPDATE events SET is_archived = $2 WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(archived)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn toggle_favorite(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        // Single statement so concurrent toggles cannot lose an update.
        let sql = format!(
            "UPDATE events SET is_favorite = NOT is_favorite WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
