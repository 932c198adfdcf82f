//! PostgreSQL repositories, one per aggregate.

pub mod court;
pub mod reservation;
pub mod schedule;
pub mod user;

pub use court::CourtRepository;
pub use reservation::ReservationRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;

use courtbook_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error as a database error with the given message.
pub(crate) fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}
