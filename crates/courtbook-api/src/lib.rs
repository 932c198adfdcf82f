//! # courtbook-api
//!
//! HTTP API layer for Courtbook built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, logging, body limit,
//! timeout), extractors, DTOs and the mapping from [`AppError`] to HTTP
//! responses.
//!
//! [`AppError`]: courtbook_core::AppError

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
