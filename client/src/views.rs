//! Derived views over an already fetched event list. Nothing here talks to
//! the server.

use eventify_server::models::{Event, SortOrder};

/// Categories offered when creating an event. The server accepts any string.
pub const CATEGORY_SUGGESTIONS: [&str; 7] = [
    "conference",
    "workshop",
    "seminar",
    "webinar",
    "party",
    "concert",
    "other",
];

/// Case-insensitive substring match on title, description or location.
pub fn matches_query(event: &Event, query: &str) -> bool {
    let query = query.to_lowercase();
    let contains = |field: Option<&str>| {
        field
            .map(|value| value.to_lowercase().contains(&query))
            .unwrap_or(false)
    };

    contains(Some(&event.title))
        || contains(event.description.as_deref())
        || contains(event.location.as_deref())
}

/// Keeps the events matching `query`, in their current order.
pub fn search<'a, I>(events: I, query: &str) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .filter(|event| matches_query(event, query))
        .collect()
}

/// Orders by `event_date`. The sort is stable, so equal dates keep the order
/// the store returned them in.
pub fn sort_by_date<'a, I>(events: I, order: SortOrder) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.event_date.cmp(&b.event_date)),
        SortOrder::Descending => sorted.sort_by(|a, b| b.event_date.cmp(&a.event_date)),
    }
    sorted
}

/// Shortens `text` to `limit` words, appending `...` when anything was cut.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.to_string();
    }
    format!("{}...", words[..limit].join(" "))
}
