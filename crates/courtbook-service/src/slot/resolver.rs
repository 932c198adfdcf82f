//! Slot availability resolution for one court and date.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use courtbook_core::config::{BookingConfig, HorizonPolicy};
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::traits::Clock;
use courtbook_core::types::{BookingWindow, CourtId, HourLabel, WindowPosition};
use courtbook_database::BookingStore;
use courtbook_entity::court::{AvailabilityPolicy, Court};

use super::compute::{Slot, compute_slots};
use crate::input::parse_date;

/// Why a resolution differs from a plain listing of the requested date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowNotice {
    /// The date is before today; nothing can be booked.
    PastDate,
    /// The date was beyond the horizon and the last bookable date was used.
    Clamped,
    /// The date is beyond the horizon; nothing can be booked.
    BeyondHorizon,
    /// The court is deactivated.
    CourtInactive,
}

/// Resolved slots of one court and date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    /// The court.
    pub court_id: CourtId,
    /// The date asked for, after the malformed-input fallback.
    pub requested: NaiveDate,
    /// The date whose slots are listed.
    pub date: NaiveDate,
    /// Set when the listing is empty or moved for a window or court reason.
    pub notice: Option<WindowNotice>,
    /// The bookable date range.
    pub window: BookingWindow,
    /// Hours ascending.
    pub slots: Vec<Slot>,
}

impl Availability {
    /// Hours that can be claimed.
    pub fn available_hours(&self) -> Vec<HourLabel> {
        self.slots
            .iter()
            .filter(|s| s.is_available())
            .map(|s| s.hour)
            .collect()
    }
}

/// Computes the bookable slots of a court on a date.
///
/// Read-only; every call sees the store as it is at that moment.
#[derive(Debug, Clone)]
pub struct SlotResolver {
    /// Persistence handle.
    store: Arc<dyn BookingStore>,
    /// Source of today.
    clock: Arc<dyn Clock>,
    /// Booking rules.
    booking: BookingConfig,
}

impl SlotResolver {
    /// Creates a new resolver.
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>, booking: BookingConfig) -> Self {
        Self {
            store,
            clock,
            booking,
        }
    }

    /// The window as of today.
    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.clock.today(), self.booking.max_days_ahead)
    }

    /// Resolve a raw date string. Missing or malformed input means today.
    pub async fn resolve(&self, court_id: CourtId, raw_date: Option<&str>) -> AppResult<Availability> {
        let date = match raw_date.map(parse_date) {
            Some(Ok(date)) => date,
            Some(Err(_)) => {
                debug!(court_id = %court_id, raw_date = ?raw_date, "Malformed date, using today");
                self.clock.today()
            }
            None => self.clock.today(),
        };
        self.resolve_on(court_id, date).await
    }

    /// Resolve a concrete date.
    pub async fn resolve_on(&self, court_id: CourtId, requested: NaiveDate) -> AppResult<Availability> {
        let court = self
            .store
            .find_court(court_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {court_id} not found")))?;

        let window = self.window();
        let empty = |notice| Availability {
            court_id,
            requested,
            date: requested,
            notice: Some(notice),
            window,
            slots: Vec::new(),
        };

        if !court.is_active {
            return Ok(empty(WindowNotice::CourtInactive));
        }

        let (date, notice) = match window.position(requested) {
            WindowPosition::Within => (requested, None),
            WindowPosition::Past => return Ok(empty(WindowNotice::PastDate)),
            WindowPosition::BeyondHorizon => match self.booking.horizon_policy {
                HorizonPolicy::Clamp => (window.clamp(requested), Some(WindowNotice::Clamped)),
                HorizonPolicy::Reject => return Ok(empty(WindowNotice::BeyondHorizon)),
            },
        };

        let candidates = self.candidate_hours(&court, date).await?;
        let blocked: Vec<HourLabel> = self
            .store
            .list_blocked_hours(court_id, date)
            .await?
            .into_iter()
            .map(|b| b.start_time)
            .collect();
        let reserved: Vec<HourLabel> = self
            .store
            .active_reservations_on(court_id, date)
            .await?
            .into_iter()
            .map(|r| r.start_time)
            .collect();

        let slots = compute_slots(&candidates, &blocked, &reserved, self.booking.show_blocked_slots);

        Ok(Availability {
            court_id,
            requested,
            date,
            notice,
            window,
            slots,
        })
    }

    /// The hour universe of a court on a date under its policy.
    pub async fn candidate_hours(&self, court: &Court, date: NaiveDate) -> AppResult<Vec<HourLabel>> {
        match court.availability_policy {
            AvailabilityPolicy::FixedHours => Ok(self.booking.business_hours().labels()),
            AvailabilityPolicy::Whitelist => Ok(self
                .store
                .find_available_day(court.id, date)
                .await?
                .map(|day| day.hours)
                .unwrap_or_default()),
        }
    }
}
