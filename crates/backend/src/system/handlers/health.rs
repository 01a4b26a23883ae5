use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use contracts::shared::api_response::{ApiResponse, HealthResponse};

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Любой другой путь под /api
pub async fn api_not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ApiResponse<()>>) {
    tracing::warn!("Unknown API route: {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(format!(
            "API route not found: {}",
            uri.path()
        ))),
    )
}
