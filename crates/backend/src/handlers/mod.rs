pub mod a001_category;
pub mod a002_site;
pub mod catalogue;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::shared::api_error::ApiError;

/// Path id must be an integer; anything else is a client error, not a 404
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("Invalid id: {}", raw)))
}

/// Тело запроса; ошибки разбора JSON отдаются как 400 в общем конверте
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::validation(format!("Invalid request body: {}", rejection.body_text())))
}
