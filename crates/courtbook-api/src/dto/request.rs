//! Request DTOs and query strings.

use serde::{Deserialize, Serialize};

/// `?date=` of the slot listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotsQuery {
    /// Date in `YYYY-MM-DD` form; today when absent or malformed.
    pub date: Option<String>,
}

/// Filters of a court's reservation listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourtReservationsQuery {
    /// `ativa` or `cancelada`.
    pub status: Option<String>,
    /// Date in `YYYY-MM-DD` form.
    pub date: Option<String>,
}

/// `?days=` of the occupancy report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupancyQuery {
    /// Number of days from today.
    pub days: Option<u32>,
}

/// `?date=` of the blocked-hour listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocksQuery {
    /// Date in `YYYY-MM-DD` form.
    pub date: String,
}

/// Range of the whitelist listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityRangeQuery {
    /// First date, today when absent.
    pub from: Option<String>,
    /// Last date, the end of the booking window when absent.
    pub to: Option<String>,
}

/// Body of `POST /courts/{id}/blocks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHourRequest {
    /// Date in `YYYY-MM-DD` form.
    pub date: String,
    /// Hour in `HH:00` form.
    pub hour: String,
    /// Shown to the owner only.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `PUT /courts/{id}/availability/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableHoursRequest {
    /// Hours in `HH:00` form.
    pub hours: Vec<String>,
}
