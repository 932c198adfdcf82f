//! JWT claims carried by identity-provider tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtbook_core::types::UserId;
use courtbook_entity::user::{CreateUser, UserRole};

use crate::rbac::Principal;

/// JWT claims payload of a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Role granted by the identity provider.
    pub role: UserRole,
    /// Display name.
    pub name: String,
    /// Contact email, if shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer, checked when `auth.issuer` is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }

    /// The acting principal described by this token.
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id(), self.role)
    }

    /// The directory record mirrored from this token.
    pub fn to_directory_entry(&self) -> CreateUser {
        CreateUser {
            id: self.user_id(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
