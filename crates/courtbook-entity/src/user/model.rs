//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courtbook_core::types::UserId;

use super::role::UserRole;

/// A user mirrored from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identifier issued by the identity provider.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email, when the identity provider shares one.
    pub email: Option<String>,
    /// Role at the time of the last sync.
    pub role: UserRole,
    /// When the user was first recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Identifier issued by the identity provider.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email, when the identity provider shares one.
    pub email: Option<String>,
    /// Assigned role.
    pub role: UserRole,
}
