//! Owner-managed schedule: blocked hours and whitelisted dates.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use courtbook_auth::{Action, Resource, authorize};
use courtbook_core::config::BookingConfig;
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::traits::Clock;
use courtbook_core::types::{BookingWindow, CourtId, HourLabel};
use courtbook_database::BookingStore;
use courtbook_entity::court::Court;
use courtbook_entity::schedule::{AvailableDay, BlockedHour, CreateBlockedHour};

use crate::context::RequestContext;
use crate::input::{parse_date, parse_hour};

/// Longest accepted block reason.
const MAX_REASON_LEN: usize = 255;

/// Manages blocked hours and whitelisted availability of courts.
///
/// Every operation requires the court's owner or an admin.
#[derive(Debug, Clone)]
pub struct ScheduleService {
    /// Persistence handle.
    store: Arc<dyn BookingStore>,
    /// Source of today.
    clock: Arc<dyn Clock>,
    /// Booking rules.
    booking: BookingConfig,
}

impl ScheduleService {
    /// Creates a new schedule service.
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>, booking: BookingConfig) -> Self {
        Self {
            store,
            clock,
            booking,
        }
    }

    /// Block one hour. Blocking an already blocked hour replaces its reason.
    pub async fn block_hour(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        date: &str,
        hour: &str,
        reason: Option<String>,
    ) -> AppResult<BlockedHour> {
        self.managed_court(ctx, court_id).await?;
        let date = parse_date(date)?;
        let start_time = parse_hour(hour)?;

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if reason
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_REASON_LEN)
        {
            return Err(AppError::validation(format!(
                "Reason must be at most {MAX_REASON_LEN} characters"
            )));
        }

        let blocked = self
            .store
            .block_hour(&CreateBlockedHour {
                court_id,
                date,
                start_time,
                reason,
                created_by: ctx.user_id(),
            })
            .await?;

        info!(
            court_id = %court_id,
            date = %date,
            hour = %start_time,
            blocked_by = %ctx.user_id(),
            "Hour blocked"
        );
        Ok(blocked)
    }

    /// Lift a block. Returns whether a block existed.
    pub async fn unblock_hour(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        date: &str,
        hour: &str,
    ) -> AppResult<bool> {
        self.managed_court(ctx, court_id).await?;
        let date = parse_date(date)?;
        let start_time = parse_hour(hour)?;

        let removed = self.store.unblock_hour(court_id, date, start_time).await?;
        if removed {
            info!(
                court_id = %court_id,
                date = %date,
                hour = %start_time,
                unblocked_by = %ctx.user_id(),
                "Hour unblocked"
            );
        }
        Ok(removed)
    }

    /// Blocked hours of a date, ascending.
    pub async fn list_blocked(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        date: &str,
    ) -> AppResult<Vec<BlockedHour>> {
        self.managed_court(ctx, court_id).await?;
        let date = parse_date(date)?;
        self.store.list_blocked_hours(court_id, date).await
    }

    /// Replace the whitelist of a date. Duplicates are dropped and hours sorted.
    pub async fn set_available_hours(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        date: &str,
        hours: &[String],
    ) -> AppResult<AvailableDay> {
        self.managed_court(ctx, court_id).await?;
        let date = parse_date(date)?;
        let hours = hours
            .iter()
            .map(|h| parse_hour(h))
            .collect::<AppResult<BTreeSet<HourLabel>>>()?;
        let hours: Vec<HourLabel> = hours.into_iter().collect();

        let day = self
            .store
            .replace_available_hours(court_id, date, &hours)
            .await?;

        info!(
            court_id = %court_id,
            date = %date,
            hours = day.hours.len(),
            changed_by = %ctx.user_id(),
            "Whitelist replaced"
        );
        Ok(day)
    }

    /// Remove a whitelisted date. Returns whether it existed.
    pub async fn clear_available_date(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        date: &str,
    ) -> AppResult<bool> {
        self.managed_court(ctx, court_id).await?;
        let date = parse_date(date)?;

        let removed = self.store.delete_available_day(court_id, date).await?;
        if removed {
            info!(court_id = %court_id, date = %date, cleared_by = %ctx.user_id(), "Whitelist cleared");
        }
        Ok(removed)
    }

    /// Whitelisted dates between `from` and `to` inclusive.
    ///
    /// Bounds default to the booking window of today.
    pub async fn list_available_days(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        from: Option<&str>,
        to: Option<&str>,
    ) -> AppResult<Vec<AvailableDay>> {
        self.managed_court(ctx, court_id).await?;

        let window = BookingWindow::new(self.clock.today(), self.booking.max_days_ahead);
        let from = optional_date(from)?.unwrap_or(window.earliest);
        let to = optional_date(to)?.unwrap_or(window.latest);
        if from > to {
            return Err(AppError::validation(format!(
                "from ({from}) must not be after to ({to})"
            )));
        }

        self.store.list_available_days(court_id, from, to).await
    }

    async fn managed_court(&self, ctx: &RequestContext, court_id: CourtId) -> AppResult<Court> {
        let court = self
            .store
            .find_court(court_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {court_id} not found")))?;
        authorize(&ctx.principal, &Resource::court(&court), Action::ManageSchedule)?;
        Ok(court)
    }
}

fn optional_date(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_date)
        .transpose()
}
