//! # courtbook-core
//!
//! Core crate for Courtbook. Contains configuration schemas, typed
//! identifiers, pagination, the hour-slot and booking-window value types,
//! the clock abstraction, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Courtbook crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
