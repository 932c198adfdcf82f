//! Typed path parameter helpers.

use std::str::FromStr;

use courtbook_core::error::AppError;

/// Parses an entity id from a path segment.
pub fn parse_id<T>(raw: &str) -> Result<T, AppError>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid id: {raw}")))
}
