//! Reservation entities.

pub mod model;
pub mod status;

pub use model::{NewReservation, Reservation, ReservationFilter};
pub use status::ReservationStatus;
