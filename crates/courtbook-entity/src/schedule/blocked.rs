//! Owner-declared blocked hours.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courtbook_core::types::{BlockedHourId, CourtId, HourLabel, UserId};

/// An hour the owner withdrew from sale on one date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlockedHour {
    /// Unique identifier.
    pub id: BlockedHourId,
    /// The affected court.
    pub court_id: CourtId,
    /// The affected date.
    pub date: NaiveDate,
    /// The blocked start hour.
    pub start_time: HourLabel,
    /// Why the hour was blocked (maintenance, tournament, ...).
    pub reason: Option<String>,
    /// Who blocked it.
    pub created_by: UserId,
    /// When it was blocked.
    pub created_at: DateTime<Utc>,
}

/// Data required to block an hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlockedHour {
    /// The affected court.
    pub court_id: CourtId,
    /// The affected date.
    pub date: NaiveDate,
    /// The start hour to block.
    pub start_time: HourLabel,
    /// Optional reason.
    pub reason: Option<String>,
    /// Who is blocking it.
    pub created_by: UserId,
}
