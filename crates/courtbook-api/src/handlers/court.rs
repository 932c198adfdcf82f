//! Court catalogue and management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;

use courtbook_core::types::CourtId;
use courtbook_service::{CreateCourtRequest, UpdateCourtRequest};

use crate::dto::request::OccupancyQuery;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/courts
pub async fn list_courts(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let courts = state
        .court_service
        .list_active(&params.into_page_request())
        .await?;
    Ok(Json(json!({ "success": true, "data": courts })))
}

/// GET /api/courts/mine
pub async fn list_my_courts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let courts = state
        .court_service
        .list_owned(&auth, &params.into_page_request())
        .await?;
    Ok(Json(json!({ "success": true, "data": courts })))
}

/// POST /api/courts
pub async fn create_court(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateCourtRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let court = state.court_service.create(&auth, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": court })),
    ))
}

/// GET /api/courts/{id}
pub async fn get_court(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let court = state.court_service.get(id).await?;
    Ok(Json(json!({ "success": true, "data": court })))
}

/// PUT /api/courts/{id}
pub async fn update_court(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourtRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let court = state.court_service.update(&auth, id, req).await?;
    Ok(Json(json!({ "success": true, "data": court })))
}

/// DELETE /api/courts/{id}
pub async fn delete_court(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    state.court_service.delete(&auth, id).await?;
    Ok(Json(json!({ "success": true, "message": "Court deleted" })))
}

/// POST /api/courts/{id}/activate
pub async fn activate_court(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let court = state.court_service.set_active(&auth, id, true).await?;
    Ok(Json(json!({ "success": true, "data": court })))
}

/// POST /api/courts/{id}/deactivate
pub async fn deactivate_court(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let court = state.court_service.set_active(&auth, id, false).await?;
    Ok(Json(json!({ "success": true, "data": court })))
}

/// GET /api/courts/{id}/occupancy
pub async fn occupancy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<OccupancyQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let report = state.court_service.occupancy(&auth, id, query.days).await?;
    Ok(Json(json!({ "success": true, "data": report })))
}
