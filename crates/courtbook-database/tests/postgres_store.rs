//! PostgreSQL store tests.
//!
//! These need a disposable database:
//! `COURTBOOK_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use courtbook_core::ErrorKind;
use courtbook_core::config::DatabaseConfig;
use courtbook_core::types::{HourLabel, HourRange, UserId};
use courtbook_database::BookingStore;
use courtbook_database::store::connect_store;
use courtbook_entity::court::{AvailabilityPolicy, Court, CreateCourt};
use courtbook_entity::reservation::NewReservation;
use courtbook_entity::schedule::CreateBlockedHour;
use courtbook_entity::user::{CreateUser, UserRole};

fn database_url() -> String {
    std::env::var("COURTBOOK_TEST_DATABASE_URL").expect("COURTBOOK_TEST_DATABASE_URL must be set")
}

async fn store() -> Arc<dyn BookingStore> {
    let config = DatabaseConfig {
        provider: "postgres".to_string(),
        url: database_url(),
        ..DatabaseConfig::default()
    };
    connect_store(&config).await.expect("connect")
}

fn hours() -> HourRange {
    HourRange::new(
        HourLabel::parse("06:00").unwrap(),
        HourLabel::parse("22:00").unwrap(),
    )
}

async fn seed_court(store: &Arc<dyn BookingStore>, name: &str) -> (UserId, Court) {
    let owner_id = UserId::new();
    store
        .upsert_user(&CreateUser {
            id: owner_id,
            name: "Race Owner".to_string(),
            email: Some(format!("{owner_id}@example.com")),
            role: UserRole::CourtOwner,
        })
        .await
        .unwrap();
    let court = store
        .create_court(&CreateCourt {
            name: name.to_string(),
            address: "Rua 1".to_string(),
            court_type: "tennis".to_string(),
            description: None,
            hourly_price: Decimal::new(5000, 2),
            owner_id,
            availability_policy: AvailabilityPolicy::FixedHours,
        })
        .await
        .unwrap();
    (owner_id, court)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires PostgreSQL"]
async fn concurrent_claims_on_postgres_have_one_winner() {
    let store = store().await;

    let (owner_id, court) = seed_court(&store, "Quadra Race").await;

    let claim = NewReservation {
        court_id: court.id,
        user_id: owner_id,
        date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
        start_time: HourLabel::parse("18:00").unwrap(),
        payment_method: Some("pix".to_string()),
    };

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let claim = claim.clone();
            tokio::spawn(async move { store.insert_reservation(&claim, hours()).await })
        })
        .collect();

    let mut winners = 0;
    for joined in futures::future::join_all(tasks).await {
        match joined.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert!(e.is(ErrorKind::Conflict), "unexpected error: {e}"),
        }
    }
    assert_eq!(winners, 1);

    let active = store
        .active_reservations_on(court.id, claim.date)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);

    store.delete_court(court.id).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires PostgreSQL"]
async fn block_waits_for_in_flight_claim_and_then_refuses_new_ones() {
    let store = store().await;
    let (owner_id, court) = seed_court(&store, "Quadra Lock").await;
    let date = NaiveDate::from_ymd_opt(2030, 1, 16).unwrap();
    let hour = HourLabel::parse("19:00").unwrap();

    // Hold the court row the way an in-flight claim does.
    let pool = sqlx::PgPool::connect(&database_url()).await.unwrap();
    let mut claim_tx = pool.begin().await.unwrap();
    sqlx::query("SELECT 1 FROM courts WHERE id = $1 FOR UPDATE")
        .bind(court.id)
        .execute(&mut *claim_tx)
        .await
        .unwrap();

    let blocker = {
        let store = store.clone();
        let block = CreateBlockedHour {
            court_id: court.id,
            date,
            start_time: hour,
            reason: Some("maintenance".to_string()),
            created_by: owner_id,
        };
        tokio::spawn(async move { store.block_hour(&block).await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!blocker.is_finished(), "block must wait for the court lock");

    claim_tx.commit().await.unwrap();
    blocker.await.unwrap().unwrap();

    let err = store
        .insert_reservation(
            &NewReservation {
                court_id: court.id,
                user_id: owner_id,
                date,
                start_time: hour,
                payment_method: None,
            },
            hours(),
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict), "unexpected error: {err}");

    store.delete_court(court.id).await.unwrap();
}
