//! # courtbook-auth
//!
//! Verification of bearer tokens issued by the external identity provider,
//! and the role-based capability check applied once per operation.
//!
//! ## Modules
//!
//! - `jwt`: claims, HS256 verification, and an encoder for tooling
//! - `rbac`: the [`Principal`], [`Action`] and [`Resource`] vocabulary and
//!   the [`authorize`] check

pub mod jwt;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rbac::{Action, Principal, Resource, authorize, is_allowed};
