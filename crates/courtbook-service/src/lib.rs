//! # courtbook-service
//!
//! Booking use cases for Courtbook. The slot resolver and the reservation
//! allocator form the core; court, schedule, reservation and user
//! services cover the surrounding management operations.
//!
//! Services follow constructor injection: the [`BookingStore`] handle, the
//! clock and the booking rules are provided at construction time.
//!
//! [`BookingStore`]: courtbook_database::BookingStore

pub mod context;
pub mod court;
pub mod input;
pub mod reservation;
pub mod schedule;
pub mod slot;
pub mod user;

#[cfg(test)]
mod fixtures;

pub use context::RequestContext;
pub use court::{AdminCourtQuery, CourtService, CreateCourtRequest, DayOccupancy, UpdateCourtRequest};
pub use reservation::{CancelOutcome, ReservationAllocator, ReservationService, SlotClaim};
pub use schedule::ScheduleService;
pub use slot::{Availability, Slot, SlotResolver, SlotState, WindowNotice};
pub use user::{RegisterOwnerRequest, UserService};
