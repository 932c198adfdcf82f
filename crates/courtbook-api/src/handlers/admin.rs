//! Admin handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde_json::json;

use courtbook_service::AdminCourtQuery;

use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/courts
pub async fn search_courts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AdminCourtQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let courts = state
        .court_service
        .admin_search(&auth, &query, &params.into_page_request())
        .await?;
    Ok(Json(json!({ "success": true, "data": courts })))
}
