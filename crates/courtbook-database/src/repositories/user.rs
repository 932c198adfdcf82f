//! User directory repository.

use sqlx::PgPool;

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::types::UserId;
use courtbook_entity::user::{CreateUser, User, UserRole};

/// Repository for the local mirror of identity-provider users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// List users holding a role, by name.
    pub async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY name")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list users by role", e)
            })
    }

    /// Insert a user or refresh the stored name, email and role.
    pub async fn upsert(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, name, email, role)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (id) DO UPDATE
               SET name = EXCLUDED.name, email = EXCLUDED.email, role = EXCLUDED.role
               RETURNING *"#,
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict(format!(
                    "Email '{}' is already registered",
                    data.email.as_deref().unwrap_or_default()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to upsert user", e),
        })
    }
}
