//! Whitelisted availability for one court on one date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courtbook_core::types::{AvailableDateId, CourtId, HourLabel};

/// A date the owner opened for booking, with the hours offered on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AvailableDay {
    /// Identifier of the date record.
    pub id: AvailableDateId,
    /// The court the date belongs to.
    pub court_id: CourtId,
    /// The calendar date.
    pub date: NaiveDate,
    /// Offered start hours, ascending and unique.
    pub hours: Vec<HourLabel>,
}
