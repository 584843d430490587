use axum::{response::IntoResponse, response::Response, Json};
use serde::Serialize;

pub mod events;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn root() -> &'static str {
    "Eventify API is running..."
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "eventify-api",
    };

    Json(payload).into_response()
}
