//! HTTP request handlers, one module per domain.

pub mod admin;
pub mod court;
pub mod health;
pub mod reservation;
pub mod schedule;
