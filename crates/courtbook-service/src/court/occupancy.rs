//! Per-day occupancy of a court.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use courtbook_auth::{Action, Resource, authorize};
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::types::{CourtId, HourLabel};

use super::service::CourtService;
use crate::context::RequestContext;

/// Days reported when the caller gives none.
pub const DEFAULT_OCCUPANCY_DAYS: u32 = 7;
/// Longest occupancy report.
pub const MAX_OCCUPANCY_DAYS: u32 = 30;

/// Occupancy of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOccupancy {
    /// The day.
    pub date: NaiveDate,
    /// Candidate hours that are not blocked.
    pub total_slots: u32,
    /// Active reservations.
    pub reserved: u32,
    /// Slots still free.
    pub available: u32,
    /// Reserved share of the total, 0-100, one decimal.
    pub occupancy_percent: f64,
}

impl DayOccupancy {
    fn new(date: NaiveDate, total_slots: u32, reserved: u32) -> Self {
        let occupancy_percent = if total_slots == 0 {
            0.0
        } else {
            (f64::from(reserved) * 1000.0 / f64::from(total_slots)).round() / 10.0
        };
        Self {
            date,
            total_slots,
            reserved,
            available: total_slots.saturating_sub(reserved),
            occupancy_percent,
        }
    }
}

impl CourtService {
    /// Occupancy for `days` days starting today (default 7, at most 30).
    pub async fn occupancy(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        days: Option<u32>,
    ) -> AppResult<Vec<DayOccupancy>> {
        let days = days.unwrap_or(DEFAULT_OCCUPANCY_DAYS);
        if days == 0 || days > MAX_OCCUPANCY_DAYS {
            return Err(AppError::validation(format!(
                "days must be between 1 and {MAX_OCCUPANCY_DAYS}"
            )));
        }

        let court = self.get(court_id).await?;
        authorize(
            &ctx.principal,
            &Resource::court(&court),
            Action::ViewCourtReservations,
        )?;

        let from = self.clock.today();
        let mut report = Vec::with_capacity(days as usize);
        for date in from.iter_days().take(days as usize) {
            let blocked: BTreeSet<HourLabel> = self
                .store
                .list_blocked_hours(court_id, date)
                .await?
                .into_iter()
                .map(|b| b.start_time)
                .collect();
            let open: BTreeSet<HourLabel> = self
                .resolver
                .candidate_hours(&court, date)
                .await?
                .into_iter()
                .filter(|hour| !blocked.contains(hour))
                .collect();
            // Reservations on hours that were later blocked or dropped from
            // the schedule do not occupy an open slot.
            let reserved = self
                .store
                .active_reservations_on(court_id, date)
                .await?
                .iter()
                .filter(|r| open.contains(&r.start_time))
                .count();
            let total = u32::try_from(open.len()).unwrap_or(u32::MAX);
            let reserved = u32::try_from(reserved).unwrap_or(u32::MAX);
            report.push(DayOccupancy::new(date, total, reserved));
        }

        Ok(report)
    }
}
