use eventify_server::models::Event;

/// The event collections a page can show, one per list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    All,
    Upcoming,
    Archived,
    Favorites,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Collection::All => "/api/events",
            Collection::Upcoming => "/api/events/upcoming",
            Collection::Archived => "/api/events/archived",
            Collection::Favorites => "/api/events/favorites",
        }
    }

    /// Whether an event changed by a flag mutation still belongs on this page.
    /// Mutations never touch `event_date`, so upcoming membership is unchanged.
    pub fn retains(&self, event: &Event) -> bool {
        match self {
            Collection::All | Collection::Upcoming => true,
            Collection::Archived => event.is_archived,
            Collection::Favorites => event.is_favorite,
        }
    }
}
