//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use courtbook_api::{AppState, build_app};
use courtbook_auth::JwtEncoder;
use courtbook_core::config::{AppConfig, DatabaseConfig};
use courtbook_core::traits::FixedClock;
use courtbook_core::types::UserId;
use courtbook_database::MemoryBookingStore;
use courtbook_entity::user::UserRole;

/// The frozen "today" of every test app.
pub const TODAY: &str = "2024-06-10";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with adjusted configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let today = NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").expect("valid date");
        let state = AppState::new(
            config.clone(),
            Arc::new(MemoryBookingStore::new()),
            Arc::new(FixedClock(today)),
        );
        Self {
            router: build_app(state),
            encoder: JwtEncoder::new(&config.auth),
            config,
        }
    }

    /// Issue a token for a fresh user.
    pub fn login(&self, name: &str, role: UserRole) -> TestUser {
        let id = UserId::new();
        let (token, _) = self
            .encoder
            .issue(id, role, name, None)
            .expect("Failed to issue token");
        TestUser { id, token }
    }

    /// Register a court as `owner` and return its id.
    pub async fn create_court(&self, owner: &TestUser, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/courts",
                Some(serde_json::json!({
                    "name": name,
                    "address": "Rua das Palmeiras, 100",
                    "court_type": "tennis",
                    "hourly_price": "80.00",
                })),
                Some(&owner.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("court id")
            .to_string()
    }

    /// Send a request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// A user with a signed token.
pub struct TestUser {
    /// Directory id
    pub id: UserId,
    /// Bearer token
    pub token: String,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Hours currently bookable in a slot listing.
    pub fn available_hours(&self) -> Vec<String> {
        self.body["data"]["slots"]
            .as_array()
            .map(|slots| {
                slots
                    .iter()
                    .filter(|s| s["state"] == "available")
                    .filter_map(|s| s["hour"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Memory-backed configuration.
pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            provider: "memory".to_string(),
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    }
}
