//! Reservation repository implementation.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::warn;

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::types::{
    CourtId, HourRange, PageRequest, PageResponse, ReservationId,
};
use courtbook_entity::court::AvailabilityPolicy;
use courtbook_entity::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationStatus,
};

use super::db_error;

/// Name of the partial unique index guarding active slots.
pub const ACTIVE_SLOT_INDEX: &str = "reservations_active_slot_key";

/// Repository for reservation persistence.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a reservation by primary key.
    pub async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find reservation"))
    }

    /// Active reservations of a court on one date, by start time.
    pub async fn find_active_on(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            r#"SELECT * FROM reservations
               WHERE court_id = $1 AND date = $2 AND status = $3
               ORDER BY start_time"#,
        )
        .bind(court_id)
        .bind(date)
        .bind(ReservationStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list active reservations"))
    }

    /// Reservations matching a filter, newest date and hour first.
    pub async fn find_filtered(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reservations WHERE 1=1");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count reservations"))?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM reservations WHERE 1=1");
        push_filter(&mut query, filter);
        query.push(" ORDER BY date DESC, start_time DESC LIMIT ");
        query.push_bind(page.limit() as i64);
        query.push(" OFFSET ");
        query.push_bind(page.offset() as i64);

        let items = query
            .build_query_as::<Reservation>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list reservations"))?;

        Ok(PageResponse::new(items, page.page, page.page_size, total as u64))
    }

    /// Insert an active reservation after re-checking the slot in the same
    /// transaction.
    ///
    /// The court row is locked for the whole claim, so deactivation, schedule
    /// edits and blocks of the same court wait for it and vice versa.
    /// Concurrent claims on the same slot are also settled by the partial
    /// unique index: the loser gets a conflict error.
    pub async fn insert_checked(
        &self,
        claim: &NewReservation,
        business_hours: HourRange,
    ) -> AppResult<Reservation> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let court: Option<(bool, AvailabilityPolicy)> = sqlx::query_as(
            "SELECT is_active, availability_policy FROM courts WHERE id = $1 FOR UPDATE",
        )
        .bind(claim.court_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock court"))?;

        let (is_active, policy) =
            court.ok_or_else(|| AppError::not_found(format!("Court {} not found", claim.court_id)))?;
        if !is_active {
            return Err(AppError::validation("Court is not accepting reservations"));
        }

        let offered = match policy {
            AvailabilityPolicy::FixedHours => business_hours.contains(claim.start_time),
            AvailabilityPolicy::Whitelist => sqlx::query_scalar::<_, bool>(
                r#"SELECT EXISTS (
                       SELECT 1 FROM available_hours h
                       JOIN available_dates d ON d.id = h.available_date_id
                       WHERE d.court_id = $1 AND d.date = $2 AND h.start_time = $3
                   )"#,
            )
            .bind(claim.court_id)
            .bind(claim.date)
            .bind(claim.start_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to check available hours"))?,
        };

        let blocked = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (
                   SELECT 1 FROM blocked_hours
                   WHERE court_id = $1 AND date = $2 AND start_time = $3
               )"#,
        )
        .bind(claim.court_id)
        .bind(claim.date)
        .bind(claim.start_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to check blocked hours"))?;

        if !offered || blocked {
            return Err(AppError::conflict(format!(
                "Slot {} on {} is not available",
                claim.start_time, claim.date
            )));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"INSERT INTO reservations
               (id, court_id, user_id, date, start_time, end_time, status, payment_method)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(ReservationId::new())
        .bind(claim.court_id)
        .bind(claim.user_id)
        .bind(claim.date)
        .bind(claim.start_time)
        .bind(claim.start_time.next())
        .bind(ReservationStatus::Active)
        .bind(&claim.payment_method)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(ACTIVE_SLOT_INDEX) =>
            {
                warn!(
                    court_id = %claim.court_id,
                    date = %claim.date,
                    hour = %claim.start_time,
                    "Concurrent claim lost the slot"
                );
                AppError::conflict(format!(
                    "Slot {} on {} was taken by another request",
                    claim.start_time, claim.date
                ))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::validation(format!("User {} is not registered", claim.user_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert reservation", e),
        })?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit reservation"))?;

        Ok(reservation)
    }

    /// Move an active reservation to cancelled.
    ///
    /// Returns `None` when the reservation does not exist or is no longer
    /// active, so two racing cancels cannot both succeed.
    pub async fn cancel_if_active(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            r#"UPDATE reservations
               SET status = $2, updated_at = NOW()
               WHERE id = $1 AND status = $3
               RETURNING *"#,
        )
        .bind(id)
        .bind(ReservationStatus::Cancelled)
        .bind(ReservationStatus::Active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to cancel reservation"))
    }
}

fn push_filter<'a>(query: &mut QueryBuilder<'a, Postgres>, filter: &'a ReservationFilter) {
    if let Some(court_id) = filter.court_id {
        query.push(" AND court_id = ");
        query.push_bind(court_id);
    }
    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ");
        query.push_bind(user_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }
    if let Some(date) = filter.date {
        query.push(" AND date = ");
        query.push_bind(date);
    }
}
