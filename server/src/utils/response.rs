use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Event;

/// Body of every mutation that hands the affected event back.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventMessage {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn with_event(status: StatusCode, message: impl Into<String>, event: Event) -> Response {
    let body = EventMessage {
        message: message.into(),
        event,
    };
    (status, Json(body)).into_response()
}

pub fn message(message: impl Into<String>) -> Response {
    let body = MessageBody {
        message: message.into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}
