//! In-memory booking store using a Tokio mutex for single-node deployments
//! and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::types::{
    AvailableDateId, BlockedHourId, CourtId, HourLabel, HourRange, PageRequest, PageResponse,
    ReservationId, UserId,
};
use courtbook_entity::court::{AvailabilityPolicy, Court, CourtFilter, CreateCourt, UpdateCourt};
use courtbook_entity::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationStatus,
};
use courtbook_entity::schedule::{AvailableDay, BlockedHour, CreateBlockedHour};
use courtbook_entity::user::{CreateUser, User, UserRole};

use super::BookingStore;

type SlotKey = (CourtId, NaiveDate, HourLabel);

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    users: HashMap<UserId, User>,
    courts: HashMap<CourtId, Court>,
    available: HashMap<(CourtId, NaiveDate), AvailableDay>,
    blocked: HashMap<SlotKey, BlockedHour>,
    reservations: HashMap<ReservationId, Reservation>,
    /// Index of active reservations by slot.
    active_slots: HashMap<SlotKey, ReservationId>,
}

impl InnerState {
    fn require_user(&self, id: UserId, what: &str) -> AppResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::validation(format!("{what} {id} does not exist")))
        }
    }

    fn require_court(&self, id: CourtId) -> AppResult<&Court> {
        self.courts
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("Court {id} not found")))
    }

    fn is_offered(&self, court: &Court, date: NaiveDate, hour: HourLabel, hours: HourRange) -> bool {
        match court.availability_policy {
            AvailabilityPolicy::FixedHours => hours.contains(hour),
            AvailabilityPolicy::Whitelist => self
                .available
                .get(&(court.id, date))
                .is_some_and(|day| day.hours.contains(&hour)),
        }
    }
}

/// In-memory booking store.
///
/// Every operation takes the single state lock, so the slot check and the
/// insert of [`BookingStore::insert_reservation`] are one atomic step.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryBookingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn upsert_user(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;

        if let Some(email) = &data.email {
            let taken = state
                .users
                .values()
                .any(|u| u.id != data.id && u.email.as_ref() == Some(email));
            if taken {
                return Err(AppError::conflict(format!(
                    "Email '{email}' is already registered"
                )));
            }
        }

        let created_at = state
            .users
            .get(&data.id)
            .map(|u| u.created_at)
            .unwrap_or_else(Utc::now);
        let user = User {
            id: data.id,
            name: data.name.clone(),
            email: data.email.clone(),
            role: data.role,
            created_at,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn find_court(&self, id: CourtId) -> AppResult<Option<Court>> {
        Ok(self.state.lock().await.courts.get(&id).cloned())
    }

    async fn list_courts(
        &self,
        filter: &CourtFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Court>> {
        let state = self.state.lock().await;
        let mut courts: Vec<&Court> = state.courts.values().filter(|c| filter.matches(c)).collect();
        courts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        let total = courts.len() as u64;
        let items = page.apply(&courts).into_iter().cloned().collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn create_court(&self, data: &CreateCourt) -> AppResult<Court> {
        let mut state = self.state.lock().await;
        state.require_user(data.owner_id, "Owner")?;

        let now = Utc::now();
        let court = Court {
            id: CourtId::new(),
            name: data.name.clone(),
            address: data.address.clone(),
            court_type: data.court_type.clone(),
            description: data.description.clone(),
            hourly_price: data.hourly_price,
            is_active: true,
            owner_id: data.owner_id,
            availability_policy: data.availability_policy,
            created_at: now,
            updated_at: now,
        };
        state.courts.insert(court.id, court.clone());
        info!(court_id = %court.id, owner_id = %court.owner_id, "Court created");
        Ok(court)
    }

    async fn update_court(&self, id: CourtId, update: &UpdateCourt) -> AppResult<Court> {
        let mut state = self.state.lock().await;
        if let Some(owner_id) = update.owner_id {
            state.require_user(owner_id, "New owner")?;
        }
        let court = state
            .courts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Court {id} not found")))?;
        update.apply_to(court);
        Ok(court.clone())
    }

    async fn delete_court(&self, id: CourtId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.courts.remove(&id).is_none() {
            return Ok(false);
        }
        state.available.retain(|(court_id, _), _| *court_id != id);
        state.blocked.retain(|(court_id, _, _), _| *court_id != id);
        state.reservations.retain(|_, r| r.court_id != id);
        state.active_slots.retain(|(court_id, _, _), _| *court_id != id);
        info!(court_id = %id, "Court deleted with its schedule and reservations");
        Ok(true)
    }

    async fn find_available_day(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Option<AvailableDay>> {
        Ok(self.state.lock().await.available.get(&(court_id, date)).cloned())
    }

    async fn list_available_days(
        &self,
        court_id: CourtId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AvailableDay>> {
        let state = self.state.lock().await;
        let mut days: Vec<AvailableDay> = state
            .available
            .values()
            .filter(|d| d.court_id == court_id && d.date >= from && d.date <= to)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    async fn replace_available_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hours: &[HourLabel],
    ) -> AppResult<AvailableDay> {
        let mut state = self.state.lock().await;
        state.require_court(court_id)?;

        let day = state
            .available
            .entry((court_id, date))
            .or_insert_with(|| AvailableDay {
                id: AvailableDateId::new(),
                court_id,
                date,
                hours: Vec::new(),
            });
        day.hours = hours.to_vec();
        Ok(day.clone())
    }

    async fn delete_available_day(&self, court_id: CourtId, date: NaiveDate) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .available
            .remove(&(court_id, date))
            .is_some())
    }

    async fn list_blocked_hours(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<BlockedHour>> {
        let state = self.state.lock().await;
        let mut blocks: Vec<BlockedHour> = state
            .blocked
            .values()
            .filter(|b| b.court_id == court_id && b.date == date)
            .cloned()
            .collect();
        blocks.sort_by_key(|b| b.start_time);
        Ok(blocks)
    }

    async fn block_hour(&self, data: &CreateBlockedHour) -> AppResult<BlockedHour> {
        let mut state = self.state.lock().await;
        state.require_court(data.court_id)?;
        state.require_user(data.created_by, "User")?;

        let key = (data.court_id, data.date, data.start_time);
        let block = state.blocked.entry(key).or_insert_with(|| BlockedHour {
            id: BlockedHourId::new(),
            court_id: data.court_id,
            date: data.date,
            start_time: data.start_time,
            reason: None,
            created_by: data.created_by,
            created_at: Utc::now(),
        });
        block.reason = data.reason.clone();
        Ok(block.clone())
    }

    async fn unblock_hour(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        hour: HourLabel,
    ) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .blocked
            .remove(&(court_id, date, hour))
            .is_some())
    }

    async fn find_reservation(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self.state.lock().await.reservations.get(&id).cloned())
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Reservation> = state
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .collect();
        matching.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.start_time.cmp(&a.start_time))
                .then(b.created_at.cmp(&a.created_at))
        });
        let total = matching.len() as u64;
        let items = page.apply(&matching).into_iter().cloned().collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn active_reservations_on(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let state = self.state.lock().await;
        let mut active: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.court_id == court_id && r.date == date && r.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|r| r.start_time);
        Ok(active)
    }

    async fn insert_reservation(
        &self,
        claim: &NewReservation,
        business_hours: HourRange,
    ) -> AppResult<Reservation> {
        let mut state = self.state.lock().await;

        let court = state.require_court(claim.court_id)?;
        if !court.is_active {
            return Err(AppError::validation("Court is not accepting reservations"));
        }

        let key = (claim.court_id, claim.date, claim.start_time);
        let offered = state.is_offered(court, claim.date, claim.start_time, business_hours);
        if !offered || state.blocked.contains_key(&key) {
            return Err(AppError::conflict(format!(
                "Slot {} on {} is not available",
                claim.start_time, claim.date
            )));
        }

        if state.active_slots.contains_key(&key) {
            warn!(
                court_id = %claim.court_id,
                date = %claim.date,
                hour = %claim.start_time,
                "Concurrent claim lost the slot"
            );
            return Err(AppError::conflict(format!(
                "Slot {} on {} was taken by another request",
                claim.start_time, claim.date
            )));
        }

        state.require_user(claim.user_id, "User")?;

        let now = Utc::now();
        let reservation = Reservation {
            id: ReservationId::new(),
            court_id: claim.court_id,
            user_id: claim.user_id,
            date: claim.date,
            start_time: claim.start_time,
            end_time: claim.start_time.next(),
            status: ReservationStatus::Active,
            payment_method: claim.payment_method.clone(),
            created_at: now,
            updated_at: now,
        };
        state.active_slots.insert(key, reservation.id);
        state.reservations.insert(reservation.id, reservation.clone());

        Ok(reservation)
    }

    async fn cancel_reservation(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        let mut state = self.state.lock().await;

        let Some(reservation) = state.reservations.get_mut(&id) else {
            return Ok(None);
        };
        if !reservation.is_active() {
            return Ok(None);
        }
        reservation.status = ReservationStatus::Cancelled;
        reservation.updated_at = Utc::now();
        let cancelled = reservation.clone();

        state
            .active_slots
            .remove(&(cancelled.court_id, cancelled.date, cancelled.start_time));
        Ok(Some(cancelled))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn h(label: &str) -> HourLabel {
        HourLabel::parse(label).unwrap()
    }

    fn business_hours() -> HourRange {
        HourRange::new(h("06:00"), h("22:00"))
    }

    async fn seed(store: &MemoryBookingStore, policy: AvailabilityPolicy) -> (User, Court) {
        let owner = store
            .upsert_user(&CreateUser {
                id: UserId::new(),
                name: "Dona Quadra".to_string(),
                email: Some("owner@example.com".to_string()),
                role: UserRole::CourtOwner,
            })
            .await
            .unwrap();
        let court = store
            .create_court(&CreateCourt {
                name: "Quadra A".to_string(),
                address: "Rua das Palmeiras, 100".to_string(),
                court_type: "tennis".to_string(),
                description: None,
                hourly_price: Decimal::new(8000, 2),
                owner_id: owner.id,
                availability_policy: policy,
            })
            .await
            .unwrap();
        (owner, court)
    }

    fn claim(court: &Court, user: UserId, date: &str, hour: &str) -> NewReservation {
        NewReservation {
            court_id: court.id,
            user_id: user,
            date: d(date),
            start_time: h(hour),
            payment_method: None,
        }
    }

    #[tokio::test]
    async fn test_insert_sets_end_and_status() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::FixedHours).await;

        let r = store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "14:00"), business_hours())
            .await
            .unwrap();
        assert_eq!(r.end_time, h("15:00"));
        assert_eq!(r.status, ReservationStatus::Active);

        let err = store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "14:00"), business_hours())
            .await
            .unwrap_err();
        assert!(err.is(courtbook_core::ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_insert_rejects_blocked_and_unoffered_hours() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::FixedHours).await;
        store
            .block_hour(&CreateBlockedHour {
                court_id: court.id,
                date: d("2024-06-10"),
                start_time: h("10:00"),
                reason: Some("maintenance".to_string()),
                created_by: owner.id,
            })
            .await
            .unwrap();

        for hour in ["10:00", "05:00", "23:00"] {
            let err = store
                .insert_reservation(&claim(&court, owner.id, "2024-06-10", hour), business_hours())
                .await
                .unwrap_err();
            assert!(err.is(courtbook_core::ErrorKind::Conflict), "hour {hour}");
        }
    }

    #[tokio::test]
    async fn test_whitelist_policy_requires_listed_hour() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::Whitelist).await;

        let err = store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "09:00"), business_hours())
            .await
            .unwrap_err();
        assert!(err.is(courtbook_core::ErrorKind::Conflict));

        store
            .replace_available_hours(court.id, d("2024-06-10"), &[h("09:00"), h("10:00")])
            .await
            .unwrap();
        store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "09:00"), business_hours())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_frees_slot_once() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::FixedHours).await;
        let r = store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "08:00"), business_hours())
            .await
            .unwrap();

        let cancelled = store.cancel_reservation(r.id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(store.cancel_reservation(r.id).await.unwrap().is_none());

        store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "08:00"), business_hours())
            .await
            .unwrap();
        let active = store
            .active_reservations_on(court.id, d("2024-06-10"))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_inactive_court_refuses_claims() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::FixedHours).await;
        store
            .update_court(
                court.id,
                &UpdateCourt {
                    is_active: Some(false),
                    ..UpdateCourt::default()
                },
            )
            .await
            .unwrap();

        let err = store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "08:00"), business_hours())
            .await
            .unwrap_err();
        assert!(err.is(courtbook_core::ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_create_court_requires_known_owner() {
        let store = MemoryBookingStore::new();
        let err = store
            .create_court(&CreateCourt {
                name: "Quadra B".to_string(),
                address: "Rua 2".to_string(),
                court_type: "futsal".to_string(),
                description: None,
                hourly_price: Decimal::ZERO,
                owner_id: UserId::new(),
                availability_policy: AvailabilityPolicy::FixedHours,
            })
            .await
            .unwrap_err();
        assert!(err.is(courtbook_core::ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_delete_court_cascades() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::FixedHours).await;
        let r = store
            .insert_reservation(&claim(&court, owner.id, "2024-06-10", "08:00"), business_hours())
            .await
            .unwrap();

        assert!(store.delete_court(court.id).await.unwrap());
        assert!(store.find_reservation(r.id).await.unwrap().is_none());
        assert!(!store.delete_court(court.id).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_have_one_winner() {
        let store = MemoryBookingStore::new();
        let (owner, court) = seed(&store, AvailabilityPolicy::FixedHours).await;
        let claim = claim(&court, owner.id, "2024-06-10", "19:00");

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                let claim = claim.clone();
                tokio::spawn(async move { store.insert_reservation(&claim, business_hours()).await })
            })
            .collect();

        let results = futures::future::join_all(tasks).await;
        let winners = results
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(winners, 1);

        let active = store
            .active_reservations_on(court.id, d("2024-06-10"))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }
}
