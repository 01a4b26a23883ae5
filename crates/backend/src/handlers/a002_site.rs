use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use contracts::domain::a002_site::aggregate::{CreateSiteDto, Site, UpdateSiteDto};
use contracts::shared::api_response::ApiResponse;

use super::{json_body, parse_id};
use crate::shared::api_error::ApiError;
use crate::shared::app_state::AppState;

/// POST /api/sites
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateSiteDto>, JsonRejection>,
) -> Result<Json<ApiResponse<Site>>, ApiError> {
    let dto = json_body(payload)?;
    let site = state.catalogue.add_site(dto).await?;
    let message = format!("Site \"{}\" added", site.name);
    Ok(Json(ApiResponse::ok(site).with_message(message)))
}

/// PUT /api/sites/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSiteDto>, JsonRejection>,
) -> Result<Json<ApiResponse<Site>>, ApiError> {
    let id = parse_id(&id)?;
    let dto = json_body(payload)?;
    let site = state.catalogue.update_site(id, dto).await?;
    let message = format!("Site \"{}\" updated", site.name);
    Ok(Json(ApiResponse::ok(site).with_message(message)))
}

/// DELETE /api/sites/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Site>>, ApiError> {
    let id = parse_id(&id)?;
    let site = state.catalogue.delete_site(id).await?;
    let message = format!("Site \"{}\" deleted", site.name);
    Ok(Json(ApiResponse::ok(site).with_message(message)))
}
