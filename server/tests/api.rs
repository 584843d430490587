//! End-to-end tests of the Event API against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use eventify_server::media::MediaStore;
use eventify_server::models::{Event, NewEvent};
use eventify_server::routes::{api_routes, create_routes};
use eventify_server::store::{EventStore, ListQuery, MemoryEventStore, StoreError};
use eventify_server::AppState;
use uuid::Uuid;

const BOUNDARY: &str = "eventify-test-boundary";

struct TestApp {
    router: Router,
    store: Arc<MemoryEventStore>,
    uploads: TempDir,
}

fn test_app() -> TestApp {
    let store = Arc::new(MemoryEventStore::new());
    let uploads = tempfile::tempdir().unwrap();
    let state = AppState::new(store.clone(), MediaStore::new(uploads.path()));
    TestApp {
        router: api_routes(state),
        store,
        uploads,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    send_to(&app.router, request).await
}

async fn send_to(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/events")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create(app: &TestApp, title: &str, date: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/events",
            json!({ "title": title, "event_date": date }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["event"].clone()
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_root_liveness() {
    let app = test_app();
    let response = app.router.clone().oneshot(empty(Method::GET, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Eventify API is running...");

    let (status, body) = send(&app, empty(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_without_title_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/events", json!({ "event_date": "2025-06-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Title"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_create_without_event_date_is_rejected() {
    let app = test_app();
    let (status, _) = send(&app, multipart_request(&[("title", "Launch")], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_create_returns_event_with_defaults() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/events",
            json!({ "title": "Launch", "event_date": "2025-06-01", "max_attendees": 50 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Event created successfully");
    let event = &body["event"];
    assert!(!event["id"].as_str().unwrap().is_empty());
    assert_eq!(event["is_archived"], false);
    assert_eq!(event["is_favorite"], false);
    assert_eq!(event["max_attendees"], 50);
    assert_eq!(event["image_url"], Value::Null);
}

#[tokio::test]
async fn test_get_matches_created_event() {
    let app = test_app();
    let created = create(&app, "Launch", "2025-06-01").await;
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = send(&app, empty(Method::GET, &format!("/api/events/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_is_not_found() {
    let app = test_app();
    let (status, body) = send(
        &app,
        empty(Method::GET, &format!("/api/events/{}", uuid::Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");

    let (status, _) = send(&app, empty(Method::GET, "/api/events/not-an-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_multipart_create_with_image_is_served_back() {
    let app = test_app();
    let (status, body) = send(
        &app,
        multipart_request(
            &[
                ("title", "Gallery night"),
                ("event_date", "2025-07-04"),
                ("location", "Main hall"),
                ("max_attendees", ""),
                ("category", "party"),
            ],
            Some(("poster.png", b"not-really-a-png")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let event = &body["event"];
    assert_eq!(event["location"], "Main hall");
    assert_eq!(event["max_attendees"], Value::Null);
    let image_url = event["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".png"));

    let filename = image_url.trim_start_matches("/uploads/");
    assert!(app.uploads.path().join(filename).exists());

    let response = app
        .router
        .clone()
        .oneshot(empty(Method::GET, &image_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"not-really-a-png");
}

#[tokio::test]
async fn test_rejected_multipart_leaves_no_file() {
    let app = test_app();
    let (status, _) = send(
        &app,
        multipart_request(&[("event_date", "2025-07-04")], Some(("poster.png", b"bytes"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(app.uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_upload_is_not_found() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(empty(Method::GET, "/uploads/0.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_toggle_round_trip() {
    let app = test_app();
    let created = create(&app, "Launch", "2025-06-01").await;
    let uri = format!("/api/events/{}/favorite", created["id"].as_str().unwrap());

    let (status, first) = send(&app, empty(Method::PUT, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["event"]["is_favorite"], true);
    assert_eq!(first["message"], "Event marked as favorite");

    let (_, second) = send(&app, empty(Method::PUT, &uri)).await;
    assert_eq!(second["event"]["is_favorite"], false);
    assert_eq!(second["message"], "Event removed from favorites");
}

#[tokio::test]
async fn test_archive_unknown_id_leaves_store_unchanged() {
    let app = test_app();
    create(&app, "Launch", "2025-06-01").await;

    let (status, _) = send(
        &app,
        empty(
            Method::PUT,
            &format!("/api/events/{}/archive", uuid::Uuid::new_v4()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, archived) = send(&app, empty(Method::GET, "/api/events/archived")).await;
    assert!(archived.as_array().unwrap().is_empty());
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_archive_and_explicit_unarchive() {
    let app = test_app();
    let created = create(&app, "Launch", "2025-06-01").await;
    let uri = format!("/api/events/{}/archive", created["id"].as_str().unwrap());

    let (_, archived) = send(&app, empty(Method::PUT, &uri)).await;
    assert_eq!(archived["event"]["is_archived"], true);
    assert_eq!(archived["message"], "Event archived");

    let (status, restored) = send(
        &app,
        json_request(Method::PUT, &uri, json!({ "is_archived": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["event"]["is_archived"], false);
    assert_eq!(restored["message"], "Event unarchived");

    let (status, _) = send(&app, json_request(Method::PUT, &uri, json!("yes"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = test_app();
    let created = create(&app, "Launch", "2025-06-01").await;
    let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, empty(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully.");

    let (status, _) = send(&app, empty(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_filters_hold() {
    let app = test_app();
    let a = create(&app, "A", "2025-01-01").await;
    let b = create(&app, "B", "2025-01-02").await;
    create(&app, "C", "2025-01-03").await;

    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();
    send(&app, empty(Method::PUT, &format!("/api/events/{}/archive", a_id))).await;
    send(&app, empty(Method::PUT, &format!("/api/events/{}/favorite", b_id))).await;
    send(&app, empty(Method::PUT, &format!("/api/events/{}/favorite", a_id))).await;

    let (_, archived) = send(&app, empty(Method::GET, "/api/events/archived")).await;
    assert!(archived
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["is_archived"] == true));
    assert_eq!(ids(&archived), vec![a_id.to_string()]);

    let (_, favorites) = send(&app, empty(Method::GET, "/api/events/favorites")).await;
    assert!(favorites
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["is_favorite"] == true));
    assert_eq!(ids(&favorites), vec![a_id.to_string(), b_id.to_string()]);
}

#[tokio::test]
async fn test_list_all_sorted_by_date() {
    let app = test_app();
    create(&app, "Later", "2025-09-01").await;
    create(&app, "Sooner", "2025-02-01").await;
    create(&app, "Middle", "2025-05-01").await;

    let (status, list) = send(&app, empty(Method::GET, "/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sooner", "Middle", "Later"]);
}

#[tokio::test]
async fn test_upcoming_excludes_past_events() {
    let app = test_app();
    let today = Utc::now().date_naive();
    let fmt = |d: chrono::NaiveDate| d.format("%Y-%m-%d").to_string();

    create(&app, "Yesterday", &fmt(today - Duration::days(1))).await;
    create(&app, "Next week", &fmt(today + Duration::days(7))).await;
    create(&app, "Today", &fmt(today)).await;

    let (status, list) = send(&app, empty(Method::GET, "/api/events/upcoming")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Today", "Next week"]);
}

#[tokio::test]
async fn test_static_segments_win_over_id_route() {
    let app = test_app();
    for path in ["upcoming", "archived", "favorites"] {
        let (status, body) =
            send(&app, empty(Method::GET, &format!("/api/events/{}", path))).await;
        assert_eq!(status, StatusCode::OK, "/api/events/{}", path);
        assert!(body.is_array(), "/api/events/{} should list events", path);
    }
}

#[tokio::test]
async fn test_launch_scenario() {
    let app = test_app();
    let created = create(&app, "Launch", "2025-06-01").await;
    assert_eq!(created["is_archived"], false);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, archived) = send(
        &app,
        empty(Method::PUT, &format!("/api/events/{}/archive", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["event"]["is_archived"], true);

    let (_, list) = send(&app, empty(Method::GET, "/api/events/archived")).await;
    let matches = ids(&list).into_iter().filter(|e| *e == id).count();
    assert_eq!(matches, 1);
}

#[tokio::test]
async fn test_full_stack_adds_security_headers() {
    let store = Arc::new(MemoryEventStore::new());
    let uploads = tempfile::tempdir().unwrap();
    let router = create_routes(AppState::new(store, MediaStore::new(uploads.path())));

    let response = router.oneshot(empty(Method::GET, "/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_large_image_upload_is_accepted() {
    let app = test_app();
    let photo = vec![0xAB_u8; 3 * 1024 * 1024];
    let (status, body) = send(
        &app,
        multipart_request(
            &[("title", "Photo walk"), ("event_date", "2025-08-09")],
            Some(("photo.jpg", photo.as_slice())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let image_url = body["event"]["image_url"].as_str().unwrap();
    let stored = app.uploads.path().join(image_url.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::metadata(stored).unwrap().len(), photo.len() as u64);
}

#[tokio::test]
async fn test_upload_over_configured_limit_is_413() {
    let store = Arc::new(MemoryEventStore::new());
    let uploads = tempfile::tempdir().unwrap();
    let state = AppState::new(store.clone(), MediaStore::new(uploads.path()))
        .with_upload_limit(Some(64 * 1024));
    let router = api_routes(state);

    let photo = vec![0u8; 256 * 1024];
    let (status, body) = send_to(
        &router,
        multipart_request(
            &[("title", "Photo walk"), ("event_date", "2025-08-09")],
            Some(("photo.jpg", photo.as_slice())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
    assert!(store.is_empty().await);
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

/// A store whose backend is gone.
struct FailingStore;

fn pool_closed() -> StoreError {
    StoreError::Database(sqlx::Error::PoolClosed)
}

#[async_trait]
impl EventStore for FailingStore {
    async fn list(&self, _query: ListQuery) -> Result<Vec<Event>, StoreError> {
        Err(pool_closed())
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Event>, StoreError> {
        Err(pool_closed())
    }

    async fn create(&self, _event: NewEvent) -> Result<Event, StoreError> {
        Err(pool_closed())
    }

    async fn set_archived(&self, _id: Uuid, _archived: bool) -> Result<Option<Event>, StoreError> {
        Err(pool_closed())
    }

    async fn toggle_favorite(&self, _id: Uuid) -> Result<Option<Event>, StoreError> {
        Err(pool_closed())
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(pool_closed())
    }
}

#[tokio::test]
async fn test_store_faults_are_generic_500s() {
    let uploads = tempfile::tempdir().unwrap();
    let router = api_routes(AppState::new(
        Arc::new(FailingStore),
        MediaStore::new(uploads.path()),
    ));
    let id = Uuid::new_v4();

    let requests = vec![
        empty(Method::GET, "/api/events"),
        empty(Method::GET, "/api/events/upcoming"),
        empty(Method::GET, "/api/events/archived"),
        empty(Method::GET, "/api/events/favorites"),
        empty(Method::GET, &format!("/api/events/{}", id)),
        json_request(
            Method::POST,
            "/api/events",
            json!({ "title": "Launch", "event_date": "2025-06-01" }),
        ),
        empty(Method::PUT, &format!("/api/events/{}/archive", id)),
        empty(Method::PUT, &format!("/api/events/{}/favorite", id)),
        empty(Method::DELETE, &format!("/api/events/{}", id)),
    ];

    for request in requests {
        let label = format!("{} {}", request.method(), request.uri());
        let (status, body) = send_to(&router, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", label);
        assert_eq!(body, json!({ "error": "A database error occurred" }), "{}", label);
    }
}
