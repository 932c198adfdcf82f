//! Reservation status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a reservation. The only transition is
/// `Active -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status")]
pub enum ReservationStatus {
    /// Holds the slot.
    #[sqlx(rename = "ativa")]
    #[serde(rename = "ativa")]
    Active,
    /// Released; the slot is free again.
    #[sqlx(rename = "cancelada")]
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl ReservationStatus {
    /// Whether this status occupies the slot.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the stored status value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ativa",
            Self::Cancelled => "cancelada",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = courtbook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ativa" | "active" => Ok(Self::Active),
            "cancelada" | "cancelled" => Ok(Self::Cancelled),
            _ => Err(courtbook_core::AppError::validation(format!(
                "Invalid reservation status: '{s}'. Expected ativa or cancelada"
            ))),
        }
    }
}
