//! User directory kept in step with the identity provider.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::types::UserId;
use courtbook_database::BookingStore;
use courtbook_entity::user::{CreateUser, User, UserRole};

use crate::input::invalid;

/// Data for registering a court owner from the command line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterOwnerRequest {
    /// Identity-provider subject; generated when absent.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
}

/// Records the users that tokens refer to.
///
/// Reservations and courts reference users by id, so every authenticated
/// caller is written to the directory before acting.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Persistence handle.
    store: Arc<dyn BookingStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Make the directory match token claims. Writes only on change.
    pub async fn sync(&self, claims: &CreateUser) -> AppResult<User> {
        if let Some(existing) = self.store.find_user(claims.id).await? {
            if existing.name == claims.name
                && existing.email == claims.email
                && existing.role == claims.role
            {
                return Ok(existing);
            }
            debug!(user_id = %claims.id, "Refreshing directory entry from token");
        }
        self.store.upsert_user(claims).await
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: UserId) -> AppResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Register a user with the court-owner role.
    pub async fn register_owner(&self, req: RegisterOwnerRequest) -> AppResult<User> {
        req.validate().map_err(invalid)?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name must not be blank"));
        }

        let user = self
            .store
            .upsert_user(&CreateUser {
                id: req.id.unwrap_or_default(),
                name: name.to_string(),
                email: req.email.map(|e| e.trim().to_lowercase()),
                role: UserRole::CourtOwner,
            })
            .await?;

        info!(user_id = %user.id, "Court owner registered");
        Ok(user)
    }

    /// All court owners, by name.
    pub async fn list_owners(&self) -> AppResult<Vec<User>> {
        self.store.list_users_by_role(UserRole::CourtOwner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtbook_core::ErrorKind;
    use courtbook_database::MemoryBookingStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryBookingStore::new()))
    }

    #[tokio::test]
    async fn test_sync_creates_then_refreshes() {
        let users = service();
        let id = UserId::new();
        let mut claims = CreateUser {
            id,
            name: "Ana".to_string(),
            email: None,
            role: UserRole::User,
        };
        let created = users.sync(&claims).await.unwrap();
        assert_eq!(created.name, "Ana");

        claims.role = UserRole::CourtOwner;
        let refreshed = users.sync(&claims).await.unwrap();
        assert_eq!(refreshed.role, UserRole::CourtOwner);
        assert_eq!(users.get(id).await.unwrap().role, UserRole::CourtOwner);
    }

    #[tokio::test]
    async fn test_register_owner() {
        let users = service();
        let owner = users
            .register_owner(RegisterOwnerRequest {
                id: None,
                name: " Dona Quadra ".to_string(),
                email: Some("Dona@Example.com".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(owner.role, UserRole::CourtOwner);
        assert_eq!(owner.name, "Dona Quadra");
        assert_eq!(owner.email.as_deref(), Some("dona@example.com"));
        assert_eq!(users.list_owners().await.unwrap().len(), 1);

        let err = users
            .register_owner(RegisterOwnerRequest {
                id: None,
                name: "X".to_string(),
                email: Some("not-an-email".to_string()),
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }
}
