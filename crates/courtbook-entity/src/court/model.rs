//! Court entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courtbook_core::types::{CourtId, UserId};

use super::policy::AvailabilityPolicy;

/// A bookable sports court.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Court {
    /// Unique court identifier.
    pub id: CourtId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Sport or surface type (e.g. "tennis", "futsal").
    pub court_type: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Price per one-hour slot.
    pub hourly_price: Decimal,
    /// Inactive courts are hidden from the catalogue and cannot be booked.
    pub is_active: bool,
    /// The owning user.
    pub owner_id: UserId,
    /// Candidate hour strategy.
    pub availability_policy: AvailabilityPolicy,
    /// When the court was created.
    pub created_at: DateTime<Utc>,
    /// When the court was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Court {
    /// Check whether the given user owns this court.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a court.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourt {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Sport or surface type.
    pub court_type: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Price per one-hour slot.
    pub hourly_price: Decimal,
    /// The owning user.
    pub owner_id: UserId,
    /// Candidate hour strategy.
    pub availability_policy: AvailabilityPolicy,
}

/// Partial update of a court. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourt {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New type.
    pub court_type: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub hourly_price: Option<Decimal>,
    /// New owner.
    pub owner_id: Option<UserId>,
    /// New candidate hour strategy.
    pub availability_policy: Option<AvailabilityPolicy>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl UpdateCourt {
    /// Apply the patch to an in-memory court.
    pub fn apply_to(&self, court: &mut Court) {
        if let Some(name) = &self.name {
            court.name = name.clone();
        }
        if let Some(address) = &self.address {
            court.address = address.clone();
        }
        if let Some(court_type) = &self.court_type {
            court.court_type = court_type.clone();
        }
        if let Some(description) = &self.description {
            court.description = Some(description.clone());
        }
        if let Some(price) = self.hourly_price {
            court.hourly_price = price;
        }
        if let Some(owner_id) = self.owner_id {
            court.owner_id = owner_id;
        }
        if let Some(policy) = self.availability_policy {
            court.availability_policy = policy;
        }
        if let Some(active) = self.is_active {
            court.is_active = active;
        }
        court.updated_at = Utc::now();
    }
}

/// Court listing filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourtFilter {
    /// Exact type match.
    pub court_type: Option<String>,
    /// Active flag; `None` lists both.
    pub is_active: Option<bool>,
    /// Case-insensitive substring of name or address.
    pub search: Option<String>,
    /// Restrict to one owner.
    pub owner_id: Option<UserId>,
}

impl CourtFilter {
    /// Only active courts.
    pub fn active() -> Self {
        Self {
            is_active: Some(true),
            ..Self::default()
        }
    }

    /// Courts owned by one user, active or not.
    pub fn owned_by(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    /// Evaluate the filter against a court held in memory.
    pub fn matches(&self, court: &Court) -> bool {
        if let Some(court_type) = &self.court_type {
            if &court.court_type != court_type {
                return false;
            }
        }
        if let Some(active) = self.is_active {
            if court.is_active != active {
                return false;
            }
        }
        if let Some(owner_id) = self.owner_id {
            if court.owner_id != owner_id {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !court.name.to_lowercase().contains(&needle)
                && !court.address.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}
