//! End-to-end booking flow through the HTTP router.

mod helpers;

use axum::http::StatusCode;
use courtbook_core::config::HorizonPolicy;
use courtbook_entity::user::UserRole;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_quadra_a_booking_flow() {
    let app = TestApp::new();
    let owner = app.login("Dona Quadra", UserRole::CourtOwner);
    let ana = app.login("Ana", UserRole::User);
    let bruno = app.login("Bruno", UserRole::User);
    let court = app.create_court(&owner, "Quadra A").await;

    let slots = app
        .request("GET", &format!("/api/courts/{court}/slots?date=2024-06-10"), None, None)
        .await;
    assert_eq!(slots.status, StatusCode::OK);
    let hours = slots.available_hours();
    assert_eq!(hours.len(), 17);
    assert_eq!(hours.first().map(String::as_str), Some("06:00"));
    assert_eq!(hours.last().map(String::as_str), Some("22:00"));

    let booked = app
        .request(
            "POST",
            &format!("/api/courts/{court}/reservations"),
            Some(json!({ "date": "2024-06-10", "hour": "14:00", "payment_method": "pix" })),
            Some(&ana.token),
        )
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{:?}", booked.body);
    assert_eq!(booked.body["data"]["status"], "ativa");
    assert_eq!(booked.body["data"]["end_time"], "15:00");
    let reservation = booked.body["data"]["id"].as_str().unwrap().to_string();

    let slots = app
        .request("GET", &format!("/api/courts/{court}/slots?date=2024-06-10"), None, None)
        .await;
    let hours = slots.available_hours();
    assert_eq!(hours.len(), 16);
    assert!(!hours.contains(&"14:00".to_string()));

    let taken = app
        .request(
            "POST",
            &format!("/api/courts/{court}/reservations"),
            Some(json!({ "date": "2024-06-10", "hour": "14:00" })),
            Some(&bruno.token),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
    assert_eq!(taken.body["error"], "CONFLICT");

    let forbidden = app
        .request(
            "POST",
            &format!("/api/reservations/{reservation}/cancel"),
            None,
            Some(&bruno.token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    for expected in [true, false] {
        let cancelled = app
            .request(
                "POST",
                &format!("/api/reservations/{reservation}/cancel"),
                None,
                Some(&ana.token),
            )
            .await;
        assert_eq!(cancelled.status, StatusCode::OK);
        assert_eq!(cancelled.body["data"]["cancelled"], expected);
        assert_eq!(cancelled.body["data"]["reservation"]["status"], "cancelada");
    }

    let rebooked = app
        .request(
            "POST",
            &format!("/api/courts/{court}/reservations"),
            Some(json!({ "date": "2024-06-10", "hour": "14:00" })),
            Some(&bruno.token),
        )
        .await;
    assert_eq!(rebooked.status, StatusCode::CREATED);

    let mine = app
        .request("GET", "/api/reservations/mine", None, Some(&ana.token))
        .await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["data"]["total_items"], 1);
}

#[tokio::test]
async fn test_booking_window_edges() {
    let app = TestApp::new();
    let owner = app.login("Dona Quadra", UserRole::CourtOwner);
    let ana = app.login("Ana", UserRole::User);
    let court = app.create_court(&owner, "Quadra A").await;
    let path = format!("/api/courts/{court}/reservations");

    let last_day = app
        .request("POST", &path, Some(json!({ "date": "2024-07-10", "hour": "08:00" })), Some(&ana.token))
        .await;
    assert_eq!(last_day.status, StatusCode::CREATED);

    for date in ["2024-07-11", "2024-06-09"] {
        let response = app
            .request("POST", &path, Some(json!({ "date": date, "hour": "08:00" })), Some(&ana.token))
            .await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{date}");
        assert_eq!(response.body["details"]["earliest"], "2024-06-10");
        assert_eq!(response.body["details"]["latest"], "2024-07-10");
    }

    let malformed = app
        .request("POST", &path, Some(json!({ "date": "2024-06-10", "hour": "14:30" })), Some(&ana.token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slot_listing_notices() {
    let app = TestApp::new();
    let owner = app.login("Dona Quadra", UserRole::CourtOwner);
    let court = app.create_court(&owner, "Quadra A").await;

    let past = app
        .request("GET", &format!("/api/courts/{court}/slots?date=2024-06-09"), None, None)
        .await;
    assert_eq!(past.body["data"]["notice"], "past_date");
    assert!(past.available_hours().is_empty());

    let clamped = app
        .request("GET", &format!("/api/courts/{court}/slots?date=2024-12-25"), None, None)
        .await;
    assert_eq!(clamped.body["data"]["notice"], "clamped");
    assert_eq!(clamped.body["data"]["date"], "2024-07-10");

    let fallback = app
        .request("GET", &format!("/api/courts/{court}/slots?date=amanha"), None, None)
        .await;
    assert_eq!(fallback.status, StatusCode::OK);
    assert_eq!(fallback.body["data"]["date"], helpers::TODAY);

    let mut config = helpers::test_config();
    config.booking.horizon_policy = HorizonPolicy::Reject;
    let strict = TestApp::with_config(config);
    let owner = strict.login("Dona Quadra", UserRole::CourtOwner);
    let court = strict.create_court(&owner, "Quadra A").await;
    let rejected = strict
        .request("GET", &format!("/api/courts/{court}/slots?date=2024-12-25"), None, None)
        .await;
    assert_eq!(rejected.body["data"]["notice"], "beyond_horizon");
    assert!(rejected.available_hours().is_empty());
}

#[tokio::test]
async fn test_blocked_hours_leave_the_listing() {
    let app = TestApp::new();
    let owner = app.login("Dona Quadra", UserRole::CourtOwner);
    let ana = app.login("Ana", UserRole::User);
    let court = app.create_court(&owner, "Quadra A").await;

    let blocked = app
        .request(
            "POST",
            &format!("/api/courts/{court}/blocks"),
            Some(json!({ "date": "2024-06-11", "hour": "10:00", "reason": "manutenção" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(blocked.status, StatusCode::CREATED);

    let denied = app
        .request(
            "POST",
            &format!("/api/courts/{court}/blocks"),
            Some(json!({ "date": "2024-06-11", "hour": "11:00" })),
            Some(&ana.token),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let slots = app
        .request("GET", &format!("/api/courts/{court}/slots?date=2024-06-11"), None, None)
        .await;
    assert!(!slots.available_hours().contains(&"10:00".to_string()));

    let claim = app
        .request(
            "POST",
            &format!("/api/courts/{court}/reservations"),
            Some(json!({ "date": "2024-06-11", "hour": "10:00" })),
            Some(&ana.token),
        )
        .await;
    assert_eq!(claim.status, StatusCode::CONFLICT);

    let unblocked = app
        .request(
            "DELETE",
            &format!("/api/courts/{court}/blocks/2024-06-11/10:00"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(unblocked.status, StatusCode::OK);

    let again = app
        .request(
            "DELETE",
            &format!("/api/courts/{court}/blocks/2024-06-11/10:00"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = TestApp::new();
    let owner = app.login("Dona Quadra", UserRole::CourtOwner);
    let court = app.create_court(&owner, "Quadra A").await;
    let path = format!("/api/courts/{court}/reservations");
    let body = json!({ "date": "2024-06-10", "hour": "14:00" });

    let missing = app.request("POST", &path, Some(body.clone()), None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("POST", &path, Some(body), Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["error"], "UNAUTHORIZED");
}
