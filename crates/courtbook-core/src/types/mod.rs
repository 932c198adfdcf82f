//! Core type definitions used across the Courtbook workspace.

pub mod hour;
pub mod id;
pub mod pagination;
pub mod window;

pub use hour::{HourLabel, HourRange};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use window::{BookingWindow, WindowPosition};
