use axum::extract::State;
use axum::Json;
use contracts::domain::catalogue::CatalogueDocument;
use contracts::shared::api_response::ApiResponse;

use crate::shared::api_error::ApiError;
use crate::shared::app_state::AppState;

/// GET /api/data
pub async fn get_data(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CatalogueDocument>>, ApiError> {
    let document = state.catalogue.get_document().await?;
    Ok(Json(ApiResponse::ok(document)))
}
