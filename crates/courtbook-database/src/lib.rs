//! # courtbook-database
//!
//! PostgreSQL connection management, concrete repositories, and the
//! [`BookingStore`] persistence handle shared by every service. An
//! in-memory store with the same guarantees backs tests and single-node
//! demos.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BookingStore, MemoryBookingStore, PgBookingStore};
