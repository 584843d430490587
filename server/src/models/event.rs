use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

/// Wire and storage format of `event_date`.
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub max_attendees: Option<i32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_archived: bool,
    pub is_favorite: bool,
}

/// Creation payload as it arrives from a form or JSON body, before any checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub max_attendees: Option<i32>,
    pub category: Option<String>,
}

/// A draft that passed validation. Stores only ever accept this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub max_attendees: Option<i32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl NewEvent {
    /// Materializes the record with its assigned id and default flags.
    pub fn into_event(self, id: Uuid) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            event_date: self.event_date,
            time: self.time,
            location: self.location,
            organizer: self.organizer,
            max_attendees: self.max_attendees,
            category: self.category,
            image_url: self.image_url,
            is_archived: false,
            is_favorite: false,
        }
    }
}

impl EventDraft {
    /// Applies a single text form field. Unknown fields are ignored.
    pub fn set_field(&mut self, name: &str, value: String) -> Result<(), AppError> {
        match name {
            "title" => self.title = Some(value),
            "description" => self.description = Some(value),
            "event_date" => self.event_date = Some(value),
            "time" => self.time = Some(value),
            "location" => self.location = Some(value),
            "organizer" => self.organizer = Some(value),
            "category" => self.category = Some(value),
            "max_attendees" => {
                let trimmed = value.trim();
                self.max_attendees = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<i32>().map_err(|_| {
                        AppError::ValidationError(format!(
                            "max_attendees must be a whole number, got '{}'",
                            trimmed
                        ))
                    })?)
                };
            }
            other => tracing::debug!(field = other, "Ignoring unknown event field"),
        }
        Ok(())
    }

    pub fn validate(self, image_url: Option<String>) -> Result<NewEvent, AppError> {
        let title = non_blank(self.title)
            .ok_or_else(|| AppError::ValidationError("Title is required".to_string()))?;
        let raw_date = non_blank(self.event_date)
            .ok_or_else(|| AppError::ValidationError("Event date is required".to_string()))?;
        let event_date = NaiveDate::parse_from_str(&raw_date, EVENT_DATE_FORMAT).map_err(|_| {
            AppError::ValidationError(format!(
                "Invalid event date '{}'. Expected YYYY-MM-DD",
                raw_date
            ))
        })?;

        Ok(NewEvent {
            title,
            description: non_blank(self.description),
            event_date,
            time: non_blank(self.time),
            location: non_blank(self.location),
            organizer: non_blank(self.organizer),
            max_attendees: self.max_attendees,
            category: non_blank(self.category),
            image_url,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
