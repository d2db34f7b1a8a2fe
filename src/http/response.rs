//! HTTP response helpers
//!
//! Small builders shared by the provider handlers and the system routes.

use crate::constants::{CONTENT_TYPE_JSON, EMPTY_JSON_OBJECT, NOT_FOUND_BODY};
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Write a 200 JSON response
///
/// Falls back to a bare 500 if `value` cannot be encoded.
pub fn write_http_json<T: Serialize>(value: T) -> Response {
    match serde_json::to_value(&value) {
        Ok(json_value) => (StatusCode::OK, Json(json_value)).into_response(),
        Err(err) => {
            tracing::error!("Failed to encode response: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 401 with an empty JSON object body
pub fn unauthorized_empty_object() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
        EMPTY_JSON_OBJECT,
    )
        .into_response()
}

/// 404 for requests no provider and no system route claimed
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}
