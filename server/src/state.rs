use std::sync::Arc;

use crate::media::MediaStore;
use crate::store::EventStore;

/// Everything a handler needs, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub media: MediaStore,
    /// Request body cap for event creation; `None` means unlimited.
    pub max_upload_bytes: Option<usize>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, media: MediaStore) -> Self {
        Self {
            store,
            media,
            max_upload_bytes: None,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: Option<usize>) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
