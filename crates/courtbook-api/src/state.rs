//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use courtbook_auth::JwtDecoder;
use courtbook_core::config::AppConfig;
use courtbook_core::traits::Clock;
use courtbook_database::BookingStore;
use courtbook_service::{
    CourtService, ReservationAllocator, ReservationService, ScheduleService, SlotResolver,
    UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Booking store (PostgreSQL or in-memory)
    pub store: Arc<dyn BookingStore>,
    /// Source of today
    pub clock: Arc<dyn Clock>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Slot availability
    pub slot_resolver: Arc<SlotResolver>,
    /// Slot claims and cancellation
    pub reservation_allocator: Arc<ReservationAllocator>,
    /// Reservation listings
    pub reservation_service: Arc<ReservationService>,
    /// Court management
    pub court_service: Arc<CourtService>,
    /// Blocked hours and whitelists
    pub schedule_service: Arc<ScheduleService>,
    /// User directory
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire every service around one store and clock.
    pub fn new(config: AppConfig, store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>) -> Self {
        let booking = config.booking.clone();

        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let slot_resolver = Arc::new(SlotResolver::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            booking.clone(),
        ));
        let reservation_allocator = Arc::new(ReservationAllocator::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            booking.clone(),
        ));
        let reservation_service = Arc::new(ReservationService::new(Arc::clone(&store)));
        let court_service = Arc::new(CourtService::new(
            Arc::clone(&store),
            Arc::clone(&slot_resolver),
            Arc::clone(&clock),
        ));
        let schedule_service = Arc::new(ScheduleService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            booking,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            store,
            clock,
            jwt_decoder,
            slot_resolver,
            reservation_allocator,
            reservation_service,
            court_service,
            schedule_service,
            user_service,
        }
    }
}
