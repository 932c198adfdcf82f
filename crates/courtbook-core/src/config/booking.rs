//! Slot and reservation rules.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::{HourLabel, HourRange};

/// How the resolver treats dates past the booking horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HorizonPolicy {
    /// Resolve the last bookable date instead.
    #[default]
    Clamp,
    /// Return no slots.
    Reject,
}

/// Booking rules shared by the slot resolver and the allocator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// First bookable start hour under the fixed-hours policy.
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u8,
    /// Last bookable start hour (inclusive) under the fixed-hours policy.
    #[serde(default = "default_last_start_hour")]
    pub last_start_hour: u8,
    /// Booking horizon in days counted from today.
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: u32,
    /// Resolver behaviour for dates beyond the horizon.
    #[serde(default)]
    pub horizon_policy: HorizonPolicy,
    /// Include blocked hours in resolver output.
    #[serde(default = "default_true")]
    pub show_blocked_slots: bool,
    /// Booking users may not cancel reservations dated before today.
    #[serde(default = "default_true")]
    pub forbid_past_self_cancellation: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            opening_hour: default_opening_hour(),
            last_start_hour: default_last_start_hour(),
            max_days_ahead: default_max_days_ahead(),
            horizon_policy: HorizonPolicy::default(),
            show_blocked_slots: true,
            forbid_past_self_cancellation: true,
        }
    }
}

impl BookingConfig {
    /// Reject hour ranges that cannot produce a valid slot.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.last_start_hour > 23 {
            return Err(AppError::configuration(format!(
                "booking.last_start_hour must be <= 23, got {}",
                self.last_start_hour
            )));
        }
        if self.opening_hour > self.last_start_hour {
            return Err(AppError::configuration(format!(
                "booking.opening_hour ({}) is after booking.last_start_hour ({})",
                self.opening_hour, self.last_start_hour
            )));
        }
        Ok(())
    }

    /// Number of slots a fixed-hours court offers per day.
    pub fn slots_per_day(&self) -> u32 {
        u32::from(self.last_start_hour.saturating_sub(self.opening_hour)) + 1
    }

    /// The fixed-hours candidate range.
    ///
    /// Out-of-range hours are clamped to 23; `validate` rejects them first.
    pub fn business_hours(&self) -> HourRange {
        let label = |hour: u8| HourLabel::new(hour.min(23)).unwrap_or(HourLabel::MIDNIGHT);
        HourRange::new(label(self.opening_hour), label(self.last_start_hour))
    }
}

fn default_opening_hour() -> u8 {
    6
}

fn default_last_start_hour() -> u8 {
    22
}

fn default_max_days_ahead() -> u32 {
    30
}

fn default_true() -> bool {
    true
}
