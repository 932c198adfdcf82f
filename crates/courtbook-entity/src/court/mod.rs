//! Court entities.

pub mod model;
pub mod policy;

pub use model::{Court, CourtFilter, CreateCourt, UpdateCourt};
pub use policy::AvailabilityPolicy;
