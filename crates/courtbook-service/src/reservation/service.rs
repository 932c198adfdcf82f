//! Reservation listings.

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use courtbook_auth::{Action, Resource, authorize};
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::types::{CourtId, PageRequest, PageResponse};
use courtbook_database::BookingStore;
use courtbook_entity::reservation::{Reservation, ReservationFilter, ReservationStatus};

use crate::context::RequestContext;
use crate::input::parse_date;

/// Read side of reservations.
#[derive(Debug, Clone)]
pub struct ReservationService {
    /// Persistence handle.
    store: Arc<dyn BookingStore>,
}

impl ReservationService {
    /// Creates a new reservation service.
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// The caller's reservations, newest first.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let filter = ReservationFilter {
            user_id: Some(ctx.user_id()),
            ..ReservationFilter::default()
        };
        self.store.list_reservations(&filter, page).await
    }

    /// Reservations of one court for its owner or an admin.
    ///
    /// An unknown status is rejected; a malformed date filter is ignored.
    pub async fn list_for_court(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        status: Option<&str>,
        date: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let court = self
            .store
            .find_court(court_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {court_id} not found")))?;
        authorize(
            &ctx.principal,
            &Resource::court(&court),
            Action::ViewCourtReservations,
        )?;

        let status = status
            .filter(|s| !s.is_empty())
            .map(ReservationStatus::from_str)
            .transpose()?;
        let date = date.and_then(|raw| match parse_date(raw) {
            Ok(date) => Some(date),
            Err(_) => {
                debug!(court_id = %court_id, raw_date = raw, "Ignoring malformed date filter");
                None
            }
        });

        let filter = ReservationFilter {
            court_id: Some(court_id),
            status,
            date,
            ..ReservationFilter::default()
        };
        self.store.list_reservations(&filter, page).await
    }
}
