//! The bookable date range `[today, today + horizon]`.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where a date falls relative to a [`BookingWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPosition {
    /// Strictly before today.
    Past,
    /// Inside the window, both ends inclusive.
    Within,
    /// Later than the last bookable date.
    BeyondHorizon,
}

/// Inclusive range of dates that may be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    /// First bookable date (today).
    pub earliest: NaiveDate,
    /// Last bookable date.
    pub latest: NaiveDate,
}

impl BookingWindow {
    /// Window starting `today` and spanning `max_days_ahead` further days.
    pub fn new(today: NaiveDate, max_days_ahead: u32) -> Self {
        let latest = today
            .checked_add_signed(TimeDelta::days(i64::from(max_days_ahead)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            earliest: today,
            latest,
        }
    }

    /// Classify a date.
    pub fn position(&self, date: NaiveDate) -> WindowPosition {
        if date < self.earliest {
            WindowPosition::Past
        } else if date > self.latest {
            WindowPosition::BeyondHorizon
        } else {
            WindowPosition::Within
        }
    }

    /// Whether the date can be booked.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.position(date) == WindowPosition::Within
    }

    /// Pull a date into the window.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.earliest, self.latest)
    }

    /// Fail with a window error that carries the valid range.
    pub fn check(&self, date: NaiveDate) -> Result<(), AppError> {
        match self.position(date) {
            WindowPosition::Within => Ok(()),
            WindowPosition::Past => Err(self.error(format!(
                "Date {date} is in the past; bookable dates are {} to {}",
                self.earliest, self.latest
            ))),
            WindowPosition::BeyondHorizon => Err(self.error(format!(
                "Date {date} is beyond the booking horizon; bookable dates are {} to {}",
                self.earliest, self.latest
            ))),
        }
    }

    fn error(&self, message: String) -> AppError {
        AppError::window(message).with_details(serde_json::json!({
            "earliest": self.earliest,
            "latest": self.latest,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let window = BookingWindow::new(date(2024, 6, 10), 30);
        assert_eq!(window.latest, date(2024, 7, 10));
        assert!(window.contains(date(2024, 6, 10)));
        assert!(window.contains(date(2024, 7, 10)));
        assert_eq!(window.position(date(2024, 6, 9)), WindowPosition::Past);
        assert_eq!(
            window.position(date(2024, 7, 11)),
            WindowPosition::BeyondHorizon
        );
    }

    #[test]
    fn test_clamp() {
        let window = BookingWindow::new(date(2024, 6, 10), 30);
        assert_eq!(window.clamp(date(2024, 8, 1)), date(2024, 7, 10));
        assert_eq!(window.clamp(date(2024, 1, 1)), date(2024, 6, 10));
        assert_eq!(window.clamp(date(2024, 6, 20)), date(2024, 6, 20));
    }

    #[test]
    fn test_check_reports_valid_range() {
        let window = BookingWindow::new(date(2024, 6, 10), 30);
        let err = window.check(date(2024, 6, 9)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Window);
        let details = err.details.unwrap();
        assert_eq!(details["earliest"], "2024-06-10");
        assert_eq!(details["latest"], "2024-07-10");
    }
}
