//! Convenience result type alias for Courtbook.

use crate::error::AppError;

/// A specialized `Result` type for Courtbook operations.
pub type AppResult<T> = Result<T, AppError>;
