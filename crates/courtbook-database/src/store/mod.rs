//! The booking store: the persistence handle threaded through every
//! resolver, allocator and service call.
//!
//! Two implementations are provided:
//! - [`PgBookingStore`] backed by PostgreSQL repositories
//! - [`MemoryBookingStore`] guarded by one `tokio::sync::Mutex`
//!
//! Both guarantee that at most one active reservation exists per
//! (court, date, start hour).

pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use courtbook_core::config::DatabaseConfig;
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::types::{
    CourtId, HourLabel, HourRange, PageRequest, PageResponse, ReservationId, UserId,
};
use courtbook_entity::court::{Court, CourtFilter, CreateCourt, UpdateCourt};
use courtbook_entity::reservation::{NewReservation, Reservation, ReservationFilter};
use courtbook_entity::schedule::{AvailableDay, BlockedHour, CreateBlockedHour};
use courtbook_entity::user::{CreateUser, User, UserRole};

pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;

use crate::connection::DatabasePool;

/// Persistence operations needed by the booking core.
#[async_trait]
pub trait BookingStore: Send + Sync + fmt::Debug + 'static {
    // ── Users ────────────────────────────────────────────────

    /// Find a user by id.
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Record or refresh a user.
    async fn upsert_user(&self, user: &CreateUser) -> AppResult<User>;

    /// Users holding a role, by name.
    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    // ── Courts ───────────────────────────────────────────────

    /// Find a court by id.
    async fn find_court(&self, id: CourtId) -> AppResult<Option<Court>>;

    /// List courts matching a filter, by name.
    async fn list_courts(
        &self,
        filter: &CourtFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Court>>;

    /// Create a court.
    async fn create_court(&self, court: &CreateCourt) -> AppResult<Court>;

    /// Apply a partial update; `NotFound` when the court is missing.
    async fn update_court(&self, id: CourtId, update: &UpdateCourt) -> AppResult<Court>;

    /// Delete a court with its schedule and reservations.
    async fn delete_court(&self, id: CourtId) -> AppResult<bool>;

    // ── Whitelisted availability ─────────────────────────────

    /// The whitelist of one date, if the owner opened it.
    async fn find_available_day(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Option<AvailableDay>>;

    /// Opened dates between two dates inclusive, ascending.
    async fn list_available_days(
        &self,
        court_id: CourtId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AvailableDay>>;

    /// Replace the offered hours of a date. `hours` is ascending and unique.
    async fn replace_available_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hours: &[HourLabel],
    ) -> AppResult<AvailableDay>;

    /// Remove a whitelisted date.
    async fn delete_available_day(&self, court_id: CourtId, date: NaiveDate) -> AppResult<bool>;

    // ── Blocked hours ────────────────────────────────────────

    /// Blocked hours of one date, ascending.
    async fn list_blocked_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<BlockedHour>>;

    /// Block an hour; re-blocking updates the reason.
    async fn block_hour(&self, block: &CreateBlockedHour) -> AppResult<BlockedHour>;

    /// Lift a block.
    async fn unblock_hour(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hour: HourLabel,
    ) -> AppResult<bool>;

    // ── Reservations ─────────────────────────────────────────

    /// Find a reservation by id.
    async fn find_reservation(&self, id: ReservationId) -> AppResult<Option<Reservation>>;

    /// Reservations matching a filter, newest date and hour first.
    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>>;

    /// Active reservations of one date, ascending by hour.
    async fn active_reservations_on(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;

    /// Atomically re-check and claim a slot.
    ///
    /// Within one atomic unit the store verifies that the court exists
    /// (`NotFound`) and is active (`Validation`), that the hour is offered
    /// under the court's policy and not blocked (`Conflict`), and that no
    /// active reservation holds the slot (`Conflict`), then writes the new
    /// reservation with status `ativa` and an end one hour after the start.
    async fn insert_reservation(
        &self,
        claim: &NewReservation,
        business_hours: HourRange,
    ) -> AppResult<Reservation>;

    /// Transition an active reservation to cancelled.
    ///
    /// Returns `None` if the reservation is missing or already cancelled.
    async fn cancel_reservation(&self, id: ReservationId) -> AppResult<Option<Reservation>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Build the store selected by `database.provider`.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn BookingStore>> {
    match config.provider.as_str() {
        "postgres" => {
            let db = DatabasePool::connect(config).await?;
            if config.run_migrations {
                crate::migration::run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgBookingStore::new(db.pool().clone())))
        }
        "memory" => {
            info!("Using in-memory booking store; data is lost on restart");
            Ok(Arc::new(MemoryBookingStore::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider: '{other}'"
        ))),
    }
}
