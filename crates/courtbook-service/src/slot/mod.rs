//! Slot availability: which hours of a court can be booked on a date.

pub mod compute;
pub mod resolver;

pub use compute::{Slot, SlotState, compute_slots};
pub use resolver::{Availability, SlotResolver, WindowNotice};
