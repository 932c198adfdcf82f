//! Core traits defined in `courtbook-core` and implemented elsewhere.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
