//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Books courts.
    User,
    /// Owns and manages courts.
    CourtOwner,
    /// Manages every court.
    Admin,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the role may own courts.
    pub fn can_own_courts(&self) -> bool {
        matches!(self, Self::CourtOwner | Self::Admin)
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::CourtOwner => "court_owner",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = courtbook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "court_owner" | "owner" => Ok(Self::CourtOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(courtbook_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: user, court_owner, admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("COURT_OWNER".parse::<UserRole>().unwrap(), UserRole::CourtOwner);
        assert_eq!("owner".parse::<UserRole>().unwrap(), UserRole::CourtOwner);
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_ownership_capability() {
        assert!(!UserRole::User.can_own_courts());
        assert!(UserRole::CourtOwner.can_own_courts());
        assert!(UserRole::Admin.can_own_courts());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&UserRole::CourtOwner).unwrap();
        assert_eq!(json, "\"court_owner\"");
    }
}
