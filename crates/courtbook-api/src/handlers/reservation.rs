//! Slot listing, booking and cancellation handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;

use courtbook_core::types::{CourtId, ReservationId};
use courtbook_service::SlotClaim;

use crate::dto::request::{CourtReservationsQuery, SlotsQuery};
use crate::dto::response::CancelResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/courts/{id}/slots
pub async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let availability = state
        .slot_resolver
        .resolve(id, query.date.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "data": availability })))
}

/// POST /api/courts/{id}/reservations
pub async fn book_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(claim): Json<SlotClaim>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id: CourtId = parse_id(&id)?;
    let reservation = state
        .reservation_allocator
        .allocate(&auth, id, &claim)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": reservation })),
    ))
}

/// GET /api/courts/{id}/reservations
pub async fn list_court_reservations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(filter): Query<CourtReservationsQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: CourtId = parse_id(&id)?;
    let reservations = state
        .reservation_service
        .list_for_court(
            &auth,
            id,
            filter.status.as_deref(),
            filter.date.as_deref(),
            &params.into_page_request(),
        )
        .await?;
    Ok(Json(json!({ "success": true, "data": reservations })))
}

/// GET /api/reservations/mine
pub async fn list_my_reservations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reservations = state
        .reservation_service
        .list_mine(&auth, &params.into_page_request())
        .await?;
    Ok(Json(json!({ "success": true, "data": reservations })))
}

/// POST /api/reservations/{id}/cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: ReservationId = parse_id(&id)?;
    let outcome = state.reservation_allocator.cancel(&auth, id).await?;
    Ok(Json(json!({
        "success": true,
        "data": CancelResponse::from(outcome),
    })))
}
