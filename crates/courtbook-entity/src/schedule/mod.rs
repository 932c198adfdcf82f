//! Owner-managed schedule data: whitelisted days and blocked hours.

pub mod available;
pub mod blocked;

pub use available::AvailableDay;
pub use blocked::{BlockedHour, CreateBlockedHour};
