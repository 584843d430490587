pub mod event;

pub use event::{Event, EventDraft, NewEvent, EVENT_DATE_FORMAT};

use serde::{Deserialize, Serialize};

/// Direction for ordering events by `event_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}
