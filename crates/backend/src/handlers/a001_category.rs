use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use contracts::domain::a001_category::aggregate::{Category, CreateCategoryDto};
use contracts::shared::api_response::ApiResponse;

use super::{json_body, parse_id};
use crate::shared::api_error::ApiError;
use crate::shared::app_state::AppState;

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryDto>, JsonRejection>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let dto = json_body(payload)?;
    let category = state.catalogue.add_category(dto).await?;
    let message = format!("Category \"{}\" added", category.name);
    Ok(Json(ApiResponse::ok(category).with_message(message)))
}

/// DELETE /api/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = parse_id(&id)?;
    let category = state.catalogue.delete_category(id).await?;
    let message = format!("Category \"{}\" deleted", category.name);
    Ok(Json(ApiResponse::ok(category).with_message(message)))
}
