//! Blocked hours and whitelisted availability.

pub mod service;

pub use service::ScheduleService;
