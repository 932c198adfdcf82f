//! Source of "today" for window checks.

use std::fmt;

use chrono::{Local, NaiveDate};

/// Supplies the current calendar date.
///
/// Every date rule (booking horizon, past-reservation cancellation, the
/// malformed-date fallback) reads today from a `Clock` so that it can be
/// pinned in tests.
pub trait Clock: Send + Sync + fmt::Debug + 'static {
    /// The current local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
