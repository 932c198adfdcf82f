//! Role-based access control.

pub mod enforcer;
pub mod policies;

pub use enforcer::{authorize, is_allowed};
pub use policies::{Action, Principal, Resource};
