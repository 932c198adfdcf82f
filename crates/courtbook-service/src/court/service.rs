//! Court catalogue and management.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use courtbook_auth::{Action, Resource, authorize};
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::traits::Clock;
use courtbook_core::types::{CourtId, PageRequest, PageResponse, UserId};
use courtbook_database::BookingStore;
use courtbook_entity::court::{AvailabilityPolicy, Court, CourtFilter, CreateCourt, UpdateCourt};
use courtbook_entity::user::UserRole;

use crate::context::RequestContext;
use crate::input::invalid;
use crate::slot::SlotResolver;

/// Request to register a court.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCourtRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Street address.
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    /// Sport or surface type.
    #[validate(length(min = 1, max = 100))]
    pub court_type: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Price per hour, not negative.
    pub hourly_price: Decimal,
    /// Owner; required when an admin creates the court.
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// Candidate hour strategy; fixed hours when absent.
    #[serde(default)]
    pub availability_policy: Option<AvailabilityPolicy>,
}

/// Request to edit a court. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCourtRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New address.
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    /// New type.
    #[validate(length(min = 1, max = 100))]
    pub court_type: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub hourly_price: Option<Decimal>,
    /// New owner; admins only.
    pub owner_id: Option<UserId>,
    /// New candidate hour strategy.
    pub availability_policy: Option<AvailabilityPolicy>,
}

/// Admin listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminCourtQuery {
    /// Exact type.
    #[serde(default, rename = "type")]
    pub court_type: Option<String>,
    /// `active`, `inactive` or `all`.
    #[serde(default)]
    pub status: Option<String>,
    /// Substring of name or address.
    #[serde(default)]
    pub search: Option<String>,
}

/// Manages courts.
#[derive(Debug, Clone)]
pub struct CourtService {
    /// Persistence handle.
    pub(super) store: Arc<dyn BookingStore>,
    /// Slot resolver, for per-day candidate hours.
    pub(super) resolver: Arc<SlotResolver>,
    /// Source of today.
    pub(super) clock: Arc<dyn Clock>,
}

impl CourtService {
    /// Creates a new court service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        resolver: Arc<SlotResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            resolver,
            clock,
        }
    }

    /// Public catalogue of active courts.
    pub async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Court>> {
        self.store.list_courts(&CourtFilter::active(), page).await
    }

    /// Courts owned by the caller, active or not.
    pub async fn list_owned(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Court>> {
        authorize(&ctx.principal, &Resource::System, Action::ListOwnedCourts)?;
        self.store
            .list_courts(&CourtFilter::owned_by(ctx.user_id()), page)
            .await
    }

    /// Gets a court by ID.
    pub async fn get(&self, id: CourtId) -> AppResult<Court> {
        self.store
            .find_court(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Court {id} not found")))
    }

    /// Register a court.
    ///
    /// Owners register courts for themselves. Admins must name an owner
    /// holding the court-owner role.
    pub async fn create(&self, ctx: &RequestContext, req: CreateCourtRequest) -> AppResult<Court> {
        authorize(&ctx.principal, &Resource::System, Action::CreateCourt)?;
        req.validate().map_err(invalid)?;
        check_price(req.hourly_price)?;
        for (field, value) in [
            ("name", &req.name),
            ("address", &req.address),
            ("court_type", &req.court_type),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{field} must not be blank")));
            }
        }

        let owner_id = if ctx.is_admin() {
            let owner_id = req.owner_id.ok_or_else(|| {
                AppError::validation("owner_id is required when an admin creates a court")
            })?;
            self.require_court_owner(owner_id).await?;
            owner_id
        } else {
            match req.owner_id {
                Some(owner_id) if owner_id != ctx.user_id() => {
                    return Err(AppError::authorization(
                        "Only admins may create courts for another owner",
                    ));
                }
                _ => ctx.user_id(),
            }
        };

        let court = self
            .store
            .create_court(&CreateCourt {
                name: req.name.trim().to_string(),
                address: req.address.trim().to_string(),
                court_type: req.court_type.trim().to_string(),
                description: req.description,
                hourly_price: req.hourly_price,
                owner_id,
                availability_policy: req.availability_policy.unwrap_or_default(),
            })
            .await?;

        info!(
            court_id = %court.id,
            owner_id = %court.owner_id,
            created_by = %ctx.user_id(),
            "Court registered"
        );
        Ok(court)
    }

    /// Edit a court. Only admins may hand it to another owner.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: CourtId,
        req: UpdateCourtRequest,
    ) -> AppResult<Court> {
        let court = self.get(id).await?;
        let resource = Resource::court(&court);
        authorize(&ctx.principal, &resource, Action::ManageCourt)?;
        req.validate().map_err(invalid)?;
        if let Some(price) = req.hourly_price {
            check_price(price)?;
        }

        let owner_id = req.owner_id.filter(|owner_id| *owner_id != court.owner_id);
        if let Some(owner_id) = owner_id {
            authorize(&ctx.principal, &resource, Action::ReassignCourtOwner)?;
            self.require_court_owner(owner_id).await?;
        }

        let update = UpdateCourt {
            name: req.name.map(|s| s.trim().to_string()),
            address: req.address.map(|s| s.trim().to_string()),
            court_type: req.court_type.map(|s| s.trim().to_string()),
            description: req.description,
            hourly_price: req.hourly_price,
            owner_id,
            availability_policy: req.availability_policy,
            is_active: None,
        };
        let updated = self.store.update_court(id, &update).await?;

        info!(court_id = %id, updated_by = %ctx.user_id(), "Court updated");
        Ok(updated)
    }

    /// Soft-deactivate or reactivate a court.
    pub async fn set_active(&self, ctx: &RequestContext, id: CourtId, active: bool) -> AppResult<Court> {
        let court = self.get(id).await?;
        authorize(&ctx.principal, &Resource::court(&court), Action::ManageCourt)?;

        let update = UpdateCourt {
            is_active: Some(active),
            ..UpdateCourt::default()
        };
        let updated = self.store.update_court(id, &update).await?;

        info!(court_id = %id, active, changed_by = %ctx.user_id(), "Court state changed");
        Ok(updated)
    }

    /// Delete a court with its schedule and reservations.
    pub async fn delete(&self, ctx: &RequestContext, id: CourtId) -> AppResult<()> {
        let court = self.get(id).await?;
        authorize(&ctx.principal, &Resource::court(&court), Action::ManageCourt)?;

        if !self.store.delete_court(id).await? {
            return Err(AppError::not_found(format!("Court {id} not found")));
        }
        info!(court_id = %id, deleted_by = %ctx.user_id(), "Court deleted");
        Ok(())
    }

    /// Admin listing with type, state and text filters.
    pub async fn admin_search(
        &self,
        ctx: &RequestContext,
        query: &AdminCourtQuery,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Court>> {
        authorize(&ctx.principal, &Resource::System, Action::AdminSearch)?;

        let is_active = match query.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some("active") => Some(true),
            Some("inactive") => Some(false),
            Some(other) => {
                return Err(AppError::validation(format!(
                    "Invalid status '{other}': expected active, inactive or all"
                )));
            }
        };
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let filter = CourtFilter {
            court_type: non_empty(&query.court_type),
            is_active,
            search: non_empty(&query.search),
            owner_id: None,
        };
        self.store.list_courts(&filter, page).await
    }

    async fn require_court_owner(&self, user_id: UserId) -> AppResult<()> {
        match self.store.find_user(user_id).await? {
            Some(user) if user.role == UserRole::CourtOwner => Ok(()),
            Some(_) => Err(AppError::validation(format!(
                "User {user_id} does not hold the court_owner role"
            ))),
            None => Err(AppError::validation(format!("Owner {user_id} does not exist"))),
        }
    }
}

fn check_price(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::validation("hourly_price must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Harness, ctx};
    use courtbook_core::ErrorKind;

    fn request(owner_id: Option<UserId>) -> CreateCourtRequest {
        CreateCourtRequest {
            name: "Quadra B".to_string(),
            address: "Av. Brasil, 200".to_string(),
            court_type: "futsal".to_string(),
            description: Some("Coberta".to_string()),
            hourly_price: Decimal::new(12000, 2),
            owner_id,
            availability_policy: None,
        }
    }

    #[tokio::test]
    async fn test_owner_creates_for_themselves() {
        let h = Harness::new().await;
        let court = h.courts.create(&ctx(&h.owner), request(None)).await.unwrap();
        assert_eq!(court.owner_id, h.owner.id);
        assert!(court.is_active);
        assert_eq!(court.availability_policy, AvailabilityPolicy::FixedHours);

        let err = h
            .courts
            .create(&ctx(&h.owner), request(Some(h.player.id)))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[tokio::test]
    async fn test_admin_must_name_a_court_owner() {
        let h = Harness::new().await;
        let admin = ctx(&h.admin);

        let err = h.courts.create(&admin, request(None)).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = h
            .courts
            .create(&admin, request(Some(h.player.id)))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let court = h
            .courts
            .create(&admin, request(Some(h.owner.id)))
            .await
            .unwrap();
        assert_eq!(court.owner_id, h.owner.id);
    }

    #[tokio::test]
    async fn test_players_cannot_create_courts() {
        let h = Harness::new().await;
        let err = h.courts.create(&ctx(&h.player), request(None)).await.unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let h = Harness::new().await;
        let owner = ctx(&h.owner);

        let mut negative = request(None);
        negative.hourly_price = Decimal::new(-1, 0);
        assert!(h.courts.create(&owner, negative).await.unwrap_err().is(ErrorKind::Validation));

        let mut blank = request(None);
        blank.name = "   ".to_string();
        assert!(h.courts.create(&owner, blank).await.unwrap_err().is(ErrorKind::Validation));

        let mut empty = request(None);
        empty.address = String::new();
        assert!(h.courts.create(&owner, empty).await.unwrap_err().is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_only_admin_reassigns_owner() {
        let h = Harness::new().await;
        let other_owner = h
            .store
            .upsert_user(&courtbook_entity::user::CreateUser {
                id: UserId::new(),
                name: "Carlos".to_string(),
                email: None,
                role: UserRole::CourtOwner,
            })
            .await
            .unwrap();
        let reassign = UpdateCourtRequest {
            owner_id: Some(other_owner.id),
            ..UpdateCourtRequest::default()
        };

        let err = h
            .courts
            .update(&ctx(&h.owner), h.court.id, reassign.clone())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let updated = h
            .courts
            .update(&ctx(&h.admin), h.court.id, reassign)
            .await
            .unwrap();
        assert_eq!(updated.owner_id, other_owner.id);
    }

    #[tokio::test]
    async fn test_owner_edits_and_deactivates() {
        let h = Harness::new().await;
        let owner = ctx(&h.owner);

        let updated = h
            .courts
            .update(
                &owner,
                h.court.id,
                UpdateCourtRequest {
                    hourly_price: Some(Decimal::new(9000, 2)),
                    ..UpdateCourtRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.hourly_price, Decimal::new(9000, 2));

        let err = h
            .courts
            .set_active(&ctx(&h.player), h.court.id, false)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let inactive = h.courts.set_active(&owner, h.court.id, false).await.unwrap();
        assert!(!inactive.is_active);

        let catalogue = h.courts.list_active(&PageRequest::default()).await.unwrap();
        assert!(catalogue.items.iter().all(|c| c.id != h.court.id));

        let mine = h.courts.list_owned(&owner, &PageRequest::default()).await.unwrap();
        assert_eq!(mine.total_items, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_court() {
        let h = Harness::new().await;
        h.courts.delete(&ctx(&h.owner), h.court.id).await.unwrap();
        assert!(h.courts.get(h.court.id).await.unwrap_err().is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_admin_search_filters() {
        let h = Harness::new().await;
        let admin = ctx(&h.admin);
        h.courts
            .create(&admin, request(Some(h.owner.id)))
            .await
            .unwrap();
        h.courts.set_active(&admin, h.court.id, false).await.unwrap();

        let page = PageRequest::default();
        let query = |status: Option<&str>, search: Option<&str>| AdminCourtQuery {
            court_type: None,
            status: status.map(str::to_string),
            search: search.map(str::to_string),
        };

        let all = h.courts.admin_search(&admin, &query(None, None), &page).await.unwrap();
        assert_eq!(all.total_items, 2);

        let inactive = h
            .courts
            .admin_search(&admin, &query(Some("inactive"), None), &page)
            .await
            .unwrap();
        assert_eq!(inactive.total_items, 1);
        assert_eq!(inactive.items[0].id, h.court.id);

        let brasil = h
            .courts
            .admin_search(&admin, &query(Some("all"), Some("brasil")), &page)
            .await
            .unwrap();
        assert_eq!(brasil.total_items, 1);

        let err = h
            .courts
            .admin_search(&admin, &query(Some("closed"), None), &page)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = h
            .courts
            .admin_search(&ctx(&h.owner), &query(None, None), &page)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }
}
