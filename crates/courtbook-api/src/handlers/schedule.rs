//! Blocked hour and whitelist handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;

use courtbook_core::error::AppError;
use courtbook_core::types::CourtId;

use crate::dto::request::{AvailabilityRangeQuery, AvailableHoursRequest, BlockHourRequest, BlocksQuery};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// GET /api/courts/{id}/blocks
pub async fn list_blocks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<BlocksQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let blocked = state
        .schedule_service
        .list_blocked(&auth, id, &query.date)
        .await?;
    Ok(Json(json!({ "success": true, "data": blocked })))
}

/// POST /api/courts/{id}/blocks
pub async fn block_hour(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<BlockHourRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id: CourtId = parse_id(&id)?;
    let blocked = state
        .schedule_service
        .block_hour(&auth, id, &req.date, &req.hour, req.reason)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": blocked })),
    ))
}

/// DELETE /api/courts/{id}/blocks/{date}/{hour}
pub async fn unblock_hour(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, date, hour)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    if !state
        .schedule_service
        .unblock_hour(&auth, id, &date, &hour)
        .await?
    {
        return Err(AppError::not_found(format!("{hour} on {date} is not blocked")).into());
    }
    Ok(Json(json!({ "success": true, "message": "Hour unblocked" })))
}

/// GET /api/courts/{id}/availability
pub async fn list_available_days(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(range): Query<AvailabilityRangeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let days = state
        .schedule_service
        .list_available_days(&auth, id, range.from.as_deref(), range.to.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "data": days })))
}

/// PUT /api/courts/{id}/availability/{date}
pub async fn set_available_hours(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, date)): Path<(String, String)>,
    Json(req): Json<AvailableHoursRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let day = state
        .schedule_service
        .set_available_hours(&auth, id, &date, &req.hours)
        .await?;
    Ok(Json(json!({ "success": true, "data": day })))
}

/// DELETE /api/courts/{id}/availability/{date}
pub async fn clear_available_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, date)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    if !state
        .schedule_service
        .clear_available_date(&auth, id, &date)
        .await?
    {
        return Err(AppError::not_found(format!("{date} has no whitelist")).into());
    }
    Ok(Json(json!({ "success": true, "message": "Whitelist cleared" })))
}
