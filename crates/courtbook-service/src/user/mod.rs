//! User directory.

pub mod service;

pub use service::{RegisterOwnerRequest, UserService};
