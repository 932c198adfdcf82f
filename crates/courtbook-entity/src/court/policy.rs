//! Per-court strategy for the candidate hour universe.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a court's bookable hours are determined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "availability_policy", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    /// Configured business hours every day.
    #[default]
    FixedHours,
    /// Only the hours the owner listed for each date.
    Whitelist,
}

impl AvailabilityPolicy {
    /// Return the policy as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedHours => "fixed_hours",
            Self::Whitelist => "whitelist",
        }
    }
}

impl fmt::Display for AvailabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AvailabilityPolicy {
    type Err = courtbook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed_hours" | "fixed" => Ok(Self::FixedHours),
            "whitelist" => Ok(Self::Whitelist),
            _ => Err(courtbook_core::AppError::validation(format!(
                "Invalid availability policy: '{s}'. Expected fixed_hours or whitelist"
            ))),
        }
    }
}
