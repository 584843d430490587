use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Event, EventDraft};
use crate::state::AppState;
use crate::store::{EventFilter, ListQuery};
use crate::utils::error::AppError;
use crate::utils::response::{message, with_event};

/// Multipart part carrying the optional event image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    #[serde(default = "default_archived")]
    pub is_archived: bool,
}

fn default_archived() -> bool {
    true
}

struct ImagePart {
    file_name: String,
    bytes: Bytes,
}

/// Ids that are not UUIDs cannot name an event, so they resolve to 404.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::event_not_found())
}

async fn list(state: &AppState, query: ListQuery) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.store.list(query).await?))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    list(&state, ListQuery::new(EventFilter::All).sorted_by_date()).await
}

pub async fn upcoming_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let today = Utc::now().date_naive();
    list(
        &state,
        ListQuery::new(EventFilter::UpcomingFrom(today)).sorted_by_date(),
    )
    .await
}

pub async fn archived_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    list(&state, ListQuery::new(EventFilter::Archived)).await
}

pub async fn favorite_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    list(&state, ListQuery::new(EventFilter::Favorites)).await
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let id = parse_id(&id)?;
    let event = state
        .store
        .get(id)
        .await?
        .ok_or_else(AppError::event_not_found)?;
    Ok(Json(event))
}

/// Accepts `multipart/form-data` (with an optional image) or a JSON draft.
pub async fn create_event(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let (draft, image) = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| rejected(e.status(), e.body_text()))?;
        read_form(multipart).await?
    } else {
        let Json(draft) = Json::<EventDraft>::from_request(request, &state)
            .await
            .map_err(|e| rejected(e.status(), e.body_text()))?;
        (draft, None)
    };

    // Validate before touching disk so a rejected draft leaves no file behind.
    let mut new_event = draft.validate(None)?;
    if let Some(image) = image {
        new_event.image_url = Some(state.media.save(&image.file_name, &image.bytes).await?);
    }

    let event = state.store.create(new_event).await?;
    Ok(with_event(
        StatusCode::CREATED,
        "Event created successfully",
        event,
    ))
}

pub async fn archive_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let archived = if body.iter().all(u8::is_ascii_whitespace) {
        true
    } else {
        serde_json::from_slice::<ArchiveRequest>(&body)
            .map_err(|e| AppError::ValidationError(format!("Invalid archive request: {}", e)))?
            .is_archived
    };

    let event = state
        .store
        .set_archived(id, archived)
        .await?
        .ok_or_else(AppError::event_not_found)?;

    let text = if event.is_archived {
        "Event archived"
    } else {
        "Event unarchived"
    };
    Ok(with_event(StatusCode::OK, text, event))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let event = state
        .store
        .toggle_favorite(id)
        .await?
        .ok_or_else(AppError::event_not_found)?;

    let text = if event.is_favorite {
        "Event marked as favorite"
    } else {
        "Event removed from favorites"
    };
    Ok(with_event(StatusCode::OK, text, event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(AppError::event_not_found());
    }
    tracing::info!(%id, "Deleted event");
    Ok(message("Event deleted successfully."))
}

/// Body limit hits stay 413; every other unreadable body is a bad request.
fn rejected(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::ValidationError(text)
    }
}

fn form_error(e: MultipartError) -> AppError {
    rejected(e.status(), e.body_text())
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_form(mut multipart: Multipart) -> Result<(EventDraft, Option<ImagePart>), AppError> {
    let mut draft = EventDraft::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(form_error)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            // Browsers send a plain "null" text part when no file was picked.
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let bytes = field
                .bytes()
                .await
                .map_err(form_error)?;
            if !bytes.is_empty() {
                image = Some(ImagePart { file_name, bytes });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(form_error)?;
        draft.set_field(&name, value)?;
    }

    Ok((draft, image))
}
