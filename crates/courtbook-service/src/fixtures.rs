//! Shared setup for service tests: an in-memory store with a frozen clock.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use courtbook_auth::Principal;
use courtbook_core::config::BookingConfig;
use courtbook_core::traits::FixedClock;
use courtbook_core::types::UserId;
use courtbook_database::{BookingStore, MemoryBookingStore};
use courtbook_entity::court::{AvailabilityPolicy, Court, CreateCourt};
use courtbook_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;
use crate::court::CourtService;
use crate::reservation::{ReservationAllocator, ReservationService, SlotClaim};
use crate::schedule::ScheduleService;
use crate::slot::SlotResolver;

pub(crate) const TODAY: &str = "2024-06-10";

pub(crate) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub(crate) fn claim(date: &str, hour: &str) -> SlotClaim {
    SlotClaim {
        date: date.to_string(),
        hour: hour.to_string(),
        payment_method: None,
    }
}

pub(crate) fn ctx(user: &User) -> RequestContext {
    RequestContext::new(Principal::new(user.id, user.role), user.name.clone())
}

pub(crate) struct Harness {
    pub store: Arc<dyn BookingStore>,
    pub resolver: Arc<SlotResolver>,
    pub allocator: ReservationAllocator,
    pub reservations: ReservationService,
    pub courts: CourtService,
    pub schedule: ScheduleService,
    pub admin: User,
    pub owner: User,
    pub player: User,
    pub rival: User,
    pub court: Court,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(BookingConfig::default()).await
    }

    pub async fn with_config(booking: BookingConfig) -> Self {
        let store: Arc<dyn BookingStore> = Arc::new(MemoryBookingStore::new());
        let clock = Arc::new(FixedClock(date(TODAY)));

        let admin = add_user(&store, "Admin", UserRole::Admin).await;
        let owner = add_user(&store, "Dona Quadra", UserRole::CourtOwner).await;
        let player = add_user(&store, "Ana", UserRole::User).await;
        let rival = add_user(&store, "Bruno", UserRole::User).await;

        let court = store
            .create_court(&CreateCourt {
                name: "Quadra A".to_string(),
                address: "Rua das Palmeiras, 100".to_string(),
                court_type: "tennis".to_string(),
                description: None,
                hourly_price: Decimal::new(8000, 2),
                owner_id: owner.id,
                availability_policy: AvailabilityPolicy::FixedHours,
            })
            .await
            .unwrap();

        let resolver = Arc::new(SlotResolver::new(
            store.clone(),
            clock.clone(),
            booking.clone(),
        ));

        Self {
            allocator: ReservationAllocator::new(store.clone(), clock.clone(), booking.clone()),
            reservations: ReservationService::new(store.clone()),
            courts: CourtService::new(store.clone(), resolver.clone(), clock.clone()),
            schedule: ScheduleService::new(store.clone(), clock, booking),
            resolver,
            store,
            admin,
            owner,
            player,
            rival,
            court,
        }
    }
}

async fn add_user(store: &Arc<dyn BookingStore>, name: &str, role: UserRole) -> User {
    store
        .upsert_user(&CreateUser {
            id: UserId::new(),
            name: name.to_string(),
            email: None,
            role,
        })
        .await
        .unwrap()
}
