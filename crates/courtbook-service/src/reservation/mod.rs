//! Reservation allocation, cancellation and listings.

pub mod allocator;
pub mod service;

pub use allocator::{CancelOutcome, ReservationAllocator, SlotClaim};
pub use service::ReservationService;
