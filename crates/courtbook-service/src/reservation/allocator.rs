//! Reservation allocation and cancellation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use courtbook_auth::{Action, Resource, authorize};
use courtbook_core::config::BookingConfig;
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::traits::Clock;
use courtbook_core::types::{BookingWindow, CourtId, ReservationId};
use courtbook_database::BookingStore;
use courtbook_entity::reservation::{NewReservation, Reservation};

use crate::context::RequestContext;
use crate::input::{parse_date, parse_hour};

/// Longest accepted payment-method label.
const MAX_PAYMENT_LABEL: usize = 50;

/// A slot claim as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotClaim {
    /// Date in `YYYY-MM-DD` form.
    pub date: String,
    /// Start hour in `HH:00` form.
    pub hour: String,
    /// Optional payment-method label, stored verbatim.
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Result of a cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reservation", rename_all = "snake_case")]
pub enum CancelOutcome {
    /// The reservation moved from active to cancelled.
    Cancelled(Reservation),
    /// The reservation was already cancelled; nothing changed.
    AlreadyCancelled(Reservation),
}

impl CancelOutcome {
    /// The reservation in its current state.
    pub fn reservation(&self) -> &Reservation {
        match self {
            Self::Cancelled(r) | Self::AlreadyCancelled(r) => r,
        }
    }

    /// Whether this call performed the transition.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Claims and releases slots.
///
/// The allocator validates input and the booking window, then hands the
/// claim to the store, which re-checks the slot and inserts atomically.
/// It never retries.
#[derive(Debug, Clone)]
pub struct ReservationAllocator {
    /// Persistence handle.
    store: Arc<dyn BookingStore>,
    /// Source of today.
    clock: Arc<dyn Clock>,
    /// Booking rules.
    booking: BookingConfig,
}

impl ReservationAllocator {
    /// Creates a new allocator.
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>, booking: BookingConfig) -> Self {
        Self {
            store,
            clock,
            booking,
        }
    }

    /// Claim one hour of a court for the acting user.
    pub async fn allocate(
        &self,
        ctx: &RequestContext,
        court_id: CourtId,
        claim: &SlotClaim,
    ) -> AppResult<Reservation> {
        let court = self
            .store
            .find_court(court_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {court_id} not found")))?;
        if !court.is_active {
            return Err(AppError::validation("Court is not accepting reservations"));
        }
        authorize(&ctx.principal, &Resource::court(&court), Action::BookSlot)?;

        let start_time = parse_hour(&claim.hour)?;
        let date = parse_date(&claim.date)?;
        BookingWindow::new(self.clock.today(), self.booking.max_days_ahead).check(date)?;

        let payment_method = claim
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string);
        if payment_method
            .as_ref()
            .is_some_and(|label| label.chars().count() > MAX_PAYMENT_LABEL)
        {
            return Err(AppError::validation(format!(
                "Payment method label must be at most {MAX_PAYMENT_LABEL} characters"
            )));
        }

        let new = NewReservation {
            court_id,
            user_id: ctx.user_id(),
            date,
            start_time,
            payment_method,
        };

        let reservation = self
            .store
            .insert_reservation(&new, self.booking.business_hours())
            .await
            .inspect_err(|e| {
                warn!(
                    court_id = %court_id,
                    user_id = %ctx.user_id(),
                    date = %date,
                    hour = %start_time,
                    error = %e,
                    "Slot claim rejected"
                );
            })?;

        info!(
            reservation_id = %reservation.id,
            court_id = %court_id,
            user_id = %reservation.user_id,
            date = %reservation.date,
            hour = %reservation.start_time,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Cancel a reservation. Cancelling twice is not an error.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        reservation_id: ReservationId,
    ) -> AppResult<CancelOutcome> {
        let reservation = self.find(reservation_id).await?;
        let court = self
            .store
            .find_court(reservation.court_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {} not found", reservation.court_id)))?;

        authorize(
            &ctx.principal,
            &Resource::reservation(&reservation, &court),
            Action::CancelReservation,
        )?;

        if !reservation.is_active() {
            return Ok(CancelOutcome::AlreadyCancelled(reservation));
        }

        let privileged = ctx.is_admin() || court.is_owned_by(ctx.user_id());
        if self.booking.forbid_past_self_cancellation
            && !privileged
            && reservation.is_past(self.clock.today())
        {
            return Err(AppError::window(format!(
                "Reservation on {} is in the past and can no longer be cancelled",
                reservation.date
            )));
        }

        match self.store.cancel_reservation(reservation_id).await? {
            Some(cancelled) => {
                info!(
                    reservation_id = %cancelled.id,
                    court_id = %cancelled.court_id,
                    cancelled_by = %ctx.user_id(),
                    "Reservation cancelled"
                );
                Ok(CancelOutcome::Cancelled(cancelled))
            }
            None => Ok(CancelOutcome::AlreadyCancelled(self.find(reservation_id).await?)),
        }
    }

    async fn find(&self, id: ReservationId) -> AppResult<Reservation> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Harness, claim, ctx, date};
    use courtbook_core::ErrorKind;
    use courtbook_core::types::PageRequest;
    use courtbook_entity::reservation::{ReservationFilter, ReservationStatus};

    #[tokio::test]
    async fn test_allocate_creates_active_one_hour_reservation() {
        let h = Harness::new().await;
        let reservation = h
            .allocator
            .allocate(
                &ctx(&h.player),
                h.court.id,
                &SlotClaim {
                    payment_method: Some("  pix ".to_string()),
                    ..claim("2024-06-10", "14:00")
                },
            )
            .await
            .unwrap();

        assert_eq!(reservation.status, ReservationStatus::Active);
        assert_eq!(reservation.user_id, h.player.id);
        assert_eq!(reservation.date, date("2024-06-10"));
        assert_eq!(reservation.start_time.to_string(), "14:00");
        assert_eq!(reservation.end_time.to_string(), "15:00");
        assert_eq!(reservation.payment_method.as_deref(), Some("pix"));
    }

    #[tokio::test]
    async fn test_second_claim_on_same_slot_conflicts() {
        let h = Harness::new().await;
        h.allocator
            .allocate(&ctx(&h.player), h.court.id, &claim("2024-06-10", "14:00"))
            .await
            .unwrap();

        let err = h
            .allocator
            .allocate(&ctx(&h.rival), h.court.id, &claim("2024-06-10", "14:00"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_produce_one_reservation() {
        let h = Harness::new().await;
        let allocator = Arc::new(h.allocator.clone());

        let mut tasks = Vec::new();
        for i in 0..16 {
            let allocator = allocator.clone();
            let user = if i % 2 == 0 { h.player.clone() } else { h.rival.clone() };
            let court_id = h.court.id;
            tasks.push(tokio::spawn(async move {
                allocator
                    .allocate(&ctx(&user), court_id, &claim("2024-06-20", "19:00"))
                    .await
            }));
        }

        let results = futures::future::join_all(tasks).await;
        let mut winners = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(e.is(ErrorKind::Conflict), "unexpected error: {e}"),
            }
        }
        assert_eq!(winners, 1);

        let active = h
            .store
            .list_reservations(
                &ReservationFilter {
                    court_id: Some(h.court.id),
                    status: Some(ReservationStatus::Active),
                    date: Some(date("2024-06-20")),
                    ..ReservationFilter::default()
                },
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(active.total_items, 1);
    }

    #[tokio::test]
    async fn test_booking_window_is_inclusive() {
        let h = Harness::new().await;
        let player = ctx(&h.player);

        h.allocator
            .allocate(&player, h.court.id, &claim("2024-07-10", "08:00"))
            .await
            .unwrap();

        for day in ["2024-07-11", "2024-06-09"] {
            let err = h
                .allocator
                .allocate(&player, h.court.id, &claim(day, "08:00"))
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::Window), "{day}");
            let details = err.details.unwrap();
            assert_eq!(details["earliest"], "2024-06-10");
            assert_eq!(details["latest"], "2024-07-10");
        }
    }

    #[tokio::test]
    async fn test_malformed_input_is_rejected() {
        let h = Harness::new().await;
        let player = ctx(&h.player);
        for (day, hour) in [("2024-06-10", "14:30"), ("10/06/2024", "14:00"), ("2024-06-10", "25:00")] {
            let err = h
                .allocator
                .allocate(&player, h.court.id, &claim(day, hour))
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::Validation), "{day} {hour}");
        }

        let err = h
            .allocator
            .allocate(
                &player,
                h.court.id,
                &SlotClaim {
                    payment_method: Some("x".repeat(51)),
                    ..claim("2024-06-10", "14:00")
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_hours_outside_business_hours_conflict() {
        let h = Harness::new().await;
        for hour in ["05:00", "23:00"] {
            let err = h
                .allocator
                .allocate(&ctx(&h.player), h.court.id, &claim("2024-06-10", hour))
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::Conflict), "{hour}");
        }
    }

    #[tokio::test]
    async fn test_unknown_court_is_not_found() {
        let h = Harness::new().await;
        let err = h
            .allocator
            .allocate(&ctx(&h.player), CourtId::new(), &claim("2024-06-10", "14:00"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_frees_the_slot() {
        let h = Harness::new().await;
        let player = ctx(&h.player);
        let reservation = h
            .allocator
            .allocate(&player, h.court.id, &claim("2024-06-11", "09:00"))
            .await
            .unwrap();

        let first = h.allocator.cancel(&player, reservation.id).await.unwrap();
        assert!(first.changed());
        assert_eq!(first.reservation().status, ReservationStatus::Cancelled);

        let second = h.allocator.cancel(&player, reservation.id).await.unwrap();
        assert!(!second.changed());
        assert_eq!(second.reservation().status, ReservationStatus::Cancelled);

        h.allocator
            .allocate(&ctx(&h.rival), h.court.id, &claim("2024-06-11", "09:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_only_booker_owner_or_admin_may_cancel() {
        let h = Harness::new().await;
        let reservation = h
            .allocator
            .allocate(&ctx(&h.player), h.court.id, &claim("2024-06-11", "09:00"))
            .await
            .unwrap();

        let err = h
            .allocator
            .cancel(&ctx(&h.rival), reservation.id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let outcome = h.allocator.cancel(&ctx(&h.owner), reservation.id).await.unwrap();
        assert!(outcome.changed());

        let err = h
            .allocator
            .cancel(&ctx(&h.admin), ReservationId::new())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_past_reservation_cannot_be_self_cancelled() {
        let h = Harness::new().await;
        let reservation = h
            .store
            .insert_reservation(
                &NewReservation {
                    court_id: h.court.id,
                    user_id: h.player.id,
                    date: date("2024-06-01"),
                    start_time: courtbook_core::types::HourLabel::new(10).unwrap(),
                    payment_method: None,
                },
                BookingConfig::default().business_hours(),
            )
            .await
            .unwrap();

        let err = h
            .allocator
            .cancel(&ctx(&h.player), reservation.id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Window));

        let outcome = h.allocator.cancel(&ctx(&h.admin), reservation.id).await.unwrap();
        assert!(outcome.changed());
    }
}
