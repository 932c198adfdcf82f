//! Response DTOs.

use serde::{Deserialize, Serialize};

use courtbook_entity::reservation::Reservation;
use courtbook_service::CancelOutcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected` or `unreachable`.
    pub database: String,
}

/// Cancellation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Whether this request changed the reservation.
    pub cancelled: bool,
    /// The reservation as it now stands.
    pub reservation: Reservation,
}

impl From<CancelOutcome> for CancelResponse {
    fn from(outcome: CancelOutcome) -> Self {
        let cancelled = outcome.changed();
        let reservation = match outcome {
            CancelOutcome::Cancelled(r) | CancelOutcome::AlreadyCancelled(r) => r,
        };
        Self {
            cancelled,
            reservation,
        }
    }
}
