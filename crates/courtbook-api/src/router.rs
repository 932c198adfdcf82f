//! Route definitions for the Courtbook HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(court_routes())
        .merge(booking_routes())
        .merge(schedule_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Catalogue and court management
fn court_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courts",
            get(handlers::court::list_courts).post(handlers::court::create_court),
        )
        .route("/courts/mine", get(handlers::court::list_my_courts))
        .route(
            "/courts/{id}",
            get(handlers::court::get_court)
                .put(handlers::court::update_court)
                .delete(handlers::court::delete_court),
        )
        .route("/courts/{id}/activate", post(handlers::court::activate_court))
        .route(
            "/courts/{id}/deactivate",
            post(handlers::court::deactivate_court),
        )
        .route("/courts/{id}/occupancy", get(handlers::court::occupancy))
}

/// Slots, reservations and cancellation
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/courts/{id}/slots", get(handlers::reservation::list_slots))
        .route(
            "/courts/{id}/reservations",
            get(handlers::reservation::list_court_reservations)
                .post(handlers::reservation::book_slot),
        )
        .route(
            "/reservations/mine",
            get(handlers::reservation::list_my_reservations),
        )
        .route(
            "/reservations/{id}/cancel",
            post(handlers::reservation::cancel_reservation),
        )
}

/// Blocked hours and whitelisted dates
fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courts/{id}/blocks",
            get(handlers::schedule::list_blocks).post(handlers::schedule::block_hour),
        )
        .route(
            "/courts/{id}/blocks/{date}/{hour}",
            delete(handlers::schedule::unblock_hour),
        )
        .route(
            "/courts/{id}/availability",
            get(handlers::schedule::list_available_days),
        )
        .route(
            "/courts/{id}/availability/{date}",
            put(handlers::schedule::set_available_hours)
                .delete(handlers::schedule::clear_available_date),
        )
}

/// Admin-only listings
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/courts", get(handlers::admin::search_courts))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
