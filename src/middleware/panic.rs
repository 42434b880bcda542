use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::Response,
};
use std::any::Any;

use crate::response::ApiResponse;

/// Renders a panic inside a handler as a 500 envelope. The panic payload is
/// logged, never sent to the client.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<String> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!("Unhandled error while serving request: {}", detail);

    let body = serde_json::to_string(&ApiResponse::<()>::failure(
        "An internal server error occurred",
        Vec::new(),
    ))
    .unwrap_or_default();

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
