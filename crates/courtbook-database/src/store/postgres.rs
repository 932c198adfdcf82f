//! PostgreSQL booking store.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::types::{
    CourtId, HourLabel, HourRange, PageRequest, PageResponse, ReservationId, UserId,
};
use courtbook_entity::court::{Court, CourtFilter, CreateCourt, UpdateCourt};
use courtbook_entity::reservation::{NewReservation, Reservation, ReservationFilter};
use courtbook_entity::schedule::{AvailableDay, BlockedHour, CreateBlockedHour};
use courtbook_entity::user::{CreateUser, User, UserRole};

use super::BookingStore;
use crate::repositories::{
    CourtRepository, ReservationRepository, ScheduleRepository, UserRepository,
};

/// Booking store backed by the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
    users: UserRepository,
    courts: CourtRepository,
    schedules: ScheduleRepository,
    reservations: ReservationRepository,
}

impl PgBookingStore {
    /// Create a store over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            courts: CourtRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn upsert_user(&self, user: &CreateUser) -> AppResult<User> {
        self.users.upsert(user).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        self.users.find_by_role(role).await
    }

    async fn find_court(&self, id: CourtId) -> AppResult<Option<Court>> {
        self.courts.find_by_id(id).await
    }

    async fn list_courts(
        &self,
        filter: &CourtFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Court>> {
        self.courts.find_filtered(filter, page).await
    }

    async fn create_court(&self, court: &CreateCourt) -> AppResult<Court> {
        self.courts.create(court).await
    }

    async fn update_court(&self, id: CourtId, update: &UpdateCourt) -> AppResult<Court> {
        self.courts
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {id} not found")))
    }

    async fn delete_court(&self, id: CourtId) -> AppResult<bool> {
        self.courts.delete(id).await
    }

    async fn find_available_day(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Option<AvailableDay>> {
        self.schedules.find_available_day(court_id, date).await
    }

    async fn list_available_days(
        &self,
        court_id: CourtId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AvailableDay>> {
        self.schedules.find_available_days(court_id, from, to).await
    }

    async fn replace_available_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hours: &[HourLabel],
    ) -> AppResult<AvailableDay> {
        self.schedules
            .replace_available_hours(court_id, date, hours)
            .await
    }

    async fn delete_available_day(&self, court_id: CourtId, date: NaiveDate) -> AppResult<bool> {
        self.schedules.delete_available_day(court_id, date).await
    }

    async fn list_blocked_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<BlockedHour>> {
        self.schedules.find_blocked(court_id, date).await
    }

    async fn block_hour(&self, block: &CreateBlockedHour) -> AppResult<BlockedHour> {
        self.schedules.block(block).await
    }

    async fn unblock_hour(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hour: HourLabel,
    ) -> AppResult<bool> {
        self.schedules.unblock(court_id, date, hour).await
    }

    async fn find_reservation(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        self.reservations.find_by_id(id).await
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        self.reservations.find_filtered(filter, page).await
    }

    async fn active_reservations_on(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.find_active_on(court_id, date).await
    }

    async fn insert_reservation(
        &self,
        claim: &NewReservation,
        business_hours: HourRange,
    ) -> AppResult<Reservation> {
        self.reservations.insert_checked(claim, business_hours).await
    }

    async fn cancel_reservation(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        self.reservations.cancel_if_active(id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
