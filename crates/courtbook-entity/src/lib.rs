//! # courtbook-entity
//!
//! Domain entity models for Courtbook. Database rows derive
//! `sqlx::FromRow`; every struct derives `Debug`, `Clone`, `Serialize`
//! and `Deserialize`.

pub mod court;
pub mod reservation;
pub mod schedule;
pub mod user;
