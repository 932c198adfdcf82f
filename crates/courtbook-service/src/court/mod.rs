//! Court catalogue, management and occupancy.

pub mod occupancy;
pub mod service;

pub use occupancy::DayOccupancy;
pub use service::{AdminCourtQuery, CourtService, CreateCourtRequest, UpdateCourtRequest};
