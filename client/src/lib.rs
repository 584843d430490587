//! Client side of Eventify: a typed API client, per-page view state, and the
//! pure derived views (search, sort, calendar) computed over fetched events.

pub mod board;
pub mod calendar;
pub mod client;
pub mod collection;
pub mod error;
pub mod views;

pub use board::{EventBoard, Notice, NoticeKind, ViewOptions};
pub use calendar::{CalendarCell, CalendarGrid, CalendarMonth, WEEKDAY_LABELS};
pub use client::{EventClient, ImageUpload};
pub use collection::Collection;
pub use error::{ClientError, ClientResult};

pub use eventify_server::models::{Event, EventDraft, SortOrder};
