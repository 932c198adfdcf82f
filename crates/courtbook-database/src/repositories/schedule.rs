//! Whitelisted availability and blocked-hour repository.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::types::{AvailableDateId, BlockedHourId, CourtId, HourLabel};
use courtbook_entity::schedule::{AvailableDay, BlockedHour, CreateBlockedHour};

use super::db_error;

const AVAILABLE_DAY_SELECT: &str = r#"
    SELECT d.id, d.court_id, d.date,
           COALESCE(
               ARRAY_AGG(h.start_time ORDER BY h.start_time)
                   FILTER (WHERE h.start_time IS NOT NULL),
               ARRAY[]::TIME[]
           ) AS hours
    FROM available_dates d
    LEFT JOIN available_hours h ON h.available_date_id = d.id
"#;

/// Lock a court row for the rest of the transaction.
///
/// Claims take the same lock, so a schedule change and a claim on one court
/// never interleave.
async fn lock_court(conn: &mut PgConnection, court_id: CourtId) -> AppResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1 FROM courts WHERE id = $1 FOR UPDATE")
        .bind(court_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to lock court"))?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found(format!("Court {court_id} not found")))
}

/// Repository for owner-managed schedule data.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Create a new schedule repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The whitelist for one court and date, if the date was opened.
    pub async fn find_available_day(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Option<AvailableDay>> {
        let sql = format!("{AVAILABLE_DAY_SELECT} WHERE d.court_id = $1 AND d.date = $2 GROUP BY d.id");
        sqlx::query_as::<_, AvailableDay>(&sql)
            .bind(court_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load available hours", e)
            })
    }

    /// Opened dates for a court between two dates inclusive.
    pub async fn find_available_days(
        &self,
        court_id: CourtId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AvailableDay>> {
        let sql = format!(
            "{AVAILABLE_DAY_SELECT} WHERE d.court_id = $1 AND d.date BETWEEN $2 AND $3 \
             GROUP BY d.id ORDER BY d.date"
        );
        sqlx::query_as::<_, AvailableDay>(&sql)
            .bind(court_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list available days", e)
            })
    }

    /// Replace the offered hours of a date, creating the date if needed.
    pub async fn replace_available_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hours: &[HourLabel],
    ) -> AppResult<AvailableDay> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        lock_court(&mut *tx, court_id).await?;

        let date_id: AvailableDateId = sqlx::query_scalar(
            r#"INSERT INTO available_dates (id, court_id, date)
               VALUES ($1, $2, $3)
               ON CONFLICT ON CONSTRAINT available_dates_court_id_date_key
               DO UPDATE SET date = EXCLUDED.date
               RETURNING id"#,
        )
        .bind(AvailableDateId::new())
        .bind(court_id)
        .bind(date)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to upsert available date"))?;

        sqlx::query("DELETE FROM available_hours WHERE available_date_id = $1")
            .bind(date_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to clear available hours"))?;

        sqlx::query(
            r#"INSERT INTO available_hours (available_date_id, start_time)
               SELECT $1, UNNEST($2::TIME[])"#,
        )
        .bind(date_id)
        .bind(hours)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert available hours"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit available hours"))?;

        Ok(AvailableDay {
            id: date_id,
            court_id,
            date,
            hours: hours.to_vec(),
        })
    }

    /// Remove a whitelisted date and its hours.
    pub async fn delete_available_day(&self, court_id: CourtId, date: NaiveDate) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        lock_court(&mut *tx, court_id).await?;

        let result = sqlx::query("DELETE FROM available_dates WHERE court_id = $1 AND date = $2")
            .bind(court_id)
            .bind(date)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete available date"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit available date removal"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Blocked hours of one court and date, ascending.
    pub async fn find_blocked(&self, court_id: CourtId, date: NaiveDate) -> AppResult<Vec<BlockedHour>> {
        sqlx::query_as::<_, BlockedHour>(
            "SELECT * FROM blocked_hours WHERE court_id = $1 AND date = $2 ORDER BY start_time",
        )
        .bind(court_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list blocked hours", e))
    }

    /// Block an hour. Re-blocking updates the reason.
    ///
    /// Runs under the court lock, so an in-flight claim on the same court
    /// either commits first or sees the block.
    pub async fn block(&self, data: &CreateBlockedHour) -> AppResult<BlockedHour> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        lock_court(&mut *tx, data.court_id).await?;

        let blocked = sqlx::query_as::<_, BlockedHour>(
            r#"INSERT INTO blocked_hours (id, court_id, date, start_time, reason, created_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT ON CONSTRAINT blocked_hours_court_id_date_start_time_key
               DO UPDATE SET reason = EXCLUDED.reason
               RETURNING *"#,
        )
        .bind(BlockedHourId::new())
        .bind(data.court_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(&data.reason)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to block hour"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit blocked hour"))?;
        Ok(blocked)
    }

    /// Lift a block.
    pub async fn unblock(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hour: HourLabel,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM blocked_hours WHERE court_id = $1 AND date = $2 AND start_time = $3",
        )
        .bind(court_id)
        .bind(date)
        .bind(hour)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unblock hour", e))?;
        Ok(result.rows_affected() > 0)
    }
}
