//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtbook_auth::Principal;
use courtbook_core::types::UserId;
use courtbook_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting principal.
    pub principal: Principal,
    /// Display name from the token.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(principal: Principal, name: impl Into<String>) -> Self {
        Self {
            principal,
            name: name.into(),
            request_time: Utc::now(),
        }
    }

    /// The acting user's ID.
    pub fn user_id(&self) -> UserId {
        self.principal.user_id
    }

    /// The acting user's role.
    pub fn role(&self) -> UserRole {
        self.principal.role
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }
}
