//! Reservation entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courtbook_core::types::{CourtId, HourLabel, ReservationId, UserId};

use super::status::ReservationStatus;

/// A claim on one court for one hour on one date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique identifier.
    pub id: ReservationId,
    /// The booked court.
    pub court_id: CourtId,
    /// The booking user.
    pub user_id: UserId,
    /// The booked date.
    pub date: NaiveDate,
    /// Slot start.
    pub start_time: HourLabel,
    /// Slot end, always one hour after the start.
    pub end_time: HourLabel,
    /// Current state.
    pub status: ReservationStatus,
    /// Label recorded for the payment method, if any.
    pub payment_method: Option<String>,
    /// When the reservation was made.
    pub created_at: DateTime<Utc>,
    /// When the reservation last changed.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether the reservation still holds its slot.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether the booked date is before `today`.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }
}

/// A validated slot claim ready to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    /// The court to book.
    pub court_id: CourtId,
    /// The booking user.
    pub user_id: UserId,
    /// The date to book.
    pub date: NaiveDate,
    /// The slot start.
    pub start_time: HourLabel,
    /// Optional payment-method label.
    pub payment_method: Option<String>,
}

/// Reservation listing filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationFilter {
    /// Restrict to one court.
    pub court_id: Option<CourtId>,
    /// Restrict to one booking user.
    pub user_id: Option<UserId>,
    /// Restrict to one status; `None` lists all.
    pub status: Option<ReservationStatus>,
    /// Restrict to one date.
    pub date: Option<NaiveDate>,
}

impl ReservationFilter {
    /// Evaluate the filter against a reservation held in memory.
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.court_id.is_none_or(|id| id == reservation.court_id)
            && self.user_id.is_none_or(|id| id == reservation.user_id)
            && self.status.is_none_or(|s| s == reservation.status)
            && self.date.is_none_or(|d| d == reservation.date)
    }
}
