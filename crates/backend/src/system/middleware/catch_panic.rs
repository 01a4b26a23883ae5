use std::any::Any;

use axum::http::{header, StatusCode};
use axum::response::Response;
use contracts::shared::api_response::ApiResponse;

/// Паника в обработчике превращается в общий ответ 500; подробности только в лог
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<String> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    let body = serde_json::to_string(&ApiResponse::<()>::failure("Internal server error"))
        .unwrap_or_else(|_| r#"{"success":false,"error":"Internal server error"}"#.to_string());

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
