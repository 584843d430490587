use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use eventify_server::models::{Event, EventDraft};
use eventify_server::utils::response::{ErrorBody, EventMessage, MessageBody};

use crate::collection::Collection;
use crate::error::{ClientError, ClientResult};

/// An image picked for a new event.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct EventClient {
    http: reqwest::Client,
    base_url: String,
}

impl EventClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute URL of the event's uploaded image, if it has one.
    pub fn image_url(&self, event: &Event) -> Option<String> {
        event.image_url.as_deref().map(|path| self.url(path))
    }

    pub async fn list(&self, collection: Collection) -> ClientResult<Vec<Event>> {
        let response = self.http.get(self.url(collection.path())).send().await?;
        decode(response).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Event> {
        let response = self
            .http
            .get(self.url(&format!("/api/events/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    /// Submits the draft as a multipart form, the same shape a browser form posts.
    pub async fn create(
        &self,
        draft: &EventDraft,
        image: Option<ImageUpload>,
    ) -> ClientResult<EventMessage> {
        let mut form = Form::new();
        let text_fields = [
            ("title", &draft.title),
            ("description", &draft.description),
            ("event_date", &draft.event_date),
            ("time", &draft.time),
            ("location", &draft.location),
            ("organizer", &draft.organizer),
            ("category", &draft.category),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                form = form.text(name, value.clone());
            }
        }
        if let Some(max) = draft.max_attendees {
            form = form.text("max_attendees", max.to_string());
        }
        if let Some(image) = image {
            form = form.part("image", Part::bytes(image.bytes).file_name(image.file_name));
        }

        let response = self
            .http
            .post(self.url("/api/events"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn set_archived(&self, id: Uuid, archived: bool) -> ClientResult<EventMessage> {
        let response = self
            .http
            .put(self.url(&format!("/api/events/{}/archive", id)))
            .json(&json!({ "is_archived": archived }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn toggle_favorite(&self, id: Uuid) -> ClientResult<EventMessage> {
        let response = self
            .http
            .put(self.url(&format!("/api/events/{}/favorite", id)))
            .send()
            .await?;
        decode(response).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        let response = self
            .http
            .delete(self.url(&format!("/api/events/{}", id)))
            .send()
            .await?;
        let body: MessageBody = decode(response).await?;
        Ok(body.message)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    tracing::warn!(%status, %message, "Event API request failed");
    Err(ClientError::Api { status, message })
}
