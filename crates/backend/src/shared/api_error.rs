use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::common::CatalogueError;
use contracts::shared::api_response::ApiResponse;
use thiserror::Error;

use crate::shared::data::StoreError;

/// Ошибка обработчика API; всегда отдаётся в едином конверте `{ success: false, error }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Удаление заблокировано зависимыми записями
    #[error("{message}")]
    ReferentialConflict { message: String, dependents: usize },

    /// Устаревшая ревизия удалённого хранилища
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Persistence(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::ReferentialConflict { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogueError> for ApiError {
    fn from(e: CatalogueError) -> Self {
        match e {
            CatalogueError::SiteNotFound(_) | CatalogueError::CategoryNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            CatalogueError::CategoryInUse { site_count, .. } => ApiError::ReferentialConflict {
                message: e.to_string(),
                dependents: site_count,
            },
            CatalogueError::MissingFields(_) | CatalogueError::Invalid(_) => {
                ApiError::Validation(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => ApiError::Conflict(format!(
                "{}. Reload the catalogue and try again.",
                e
            )),
            other => ApiError::Persistence(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("API error {}: {}", status.as_u16(), self);
        } else {
            tracing::warn!("API error {}: {}", status.as_u16(), self);
        }
        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(CatalogueError::MissingFields(vec!["name"])).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CatalogueError::SiteNotFound(9)).status(),
            StatusCode::NOT_FOUND
        );
        let in_use = ApiError::from(CatalogueError::CategoryInUse { id: 1, site_count: 3 });
        assert_eq!(in_use.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(in_use, ApiError::ReferentialConflict { dependents: 3, .. }));
        assert_eq!(
            ApiError::from(StoreError::Conflict("sha mismatch".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::ReadOnly).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
