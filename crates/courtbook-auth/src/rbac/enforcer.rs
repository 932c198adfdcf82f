//! The capability check.

use tracing::debug;

use courtbook_core::error::AppError;
use courtbook_core::types::UserId;
use courtbook_entity::user::UserRole;

use super::policies::{Action, Principal, Resource};

/// Checks whether `principal` may perform `action` on `resource`.
///
/// Returns `Ok(())` if allowed, or an authorization error if denied.
pub fn authorize(principal: &Principal, resource: &Resource, action: Action) -> Result<(), AppError> {
    if is_allowed(principal, resource, action) {
        Ok(())
    } else {
        debug!(
            user_id = %principal.user_id,
            role = %principal.role,
            action = ?action,
            "Authorization denied"
        );
        Err(AppError::authorization(format!(
            "Role '{}' may not perform {action:?} on this resource",
            principal.role
        )))
    }
}

/// Checks whether `principal` may perform `action` on `resource` (returns bool).
pub fn is_allowed(principal: &Principal, resource: &Resource, action: Action) -> bool {
    if principal.is_admin() {
        return true;
    }

    let owns = |owner_id: UserId| {
        principal.role == UserRole::CourtOwner && principal.user_id == owner_id
    };

    match (action, resource) {
        (Action::BookSlot, Resource::Court { .. }) => true,
        (
            Action::CancelReservation,
            Resource::Reservation {
                user_id,
                court_owner_id,
            },
        ) => principal.user_id == *user_id || owns(*court_owner_id),
        (Action::CreateCourt | Action::ListOwnedCourts, Resource::System) => {
            principal.role.can_own_courts()
        }
        (
            Action::ManageCourt | Action::ManageSchedule | Action::ViewCourtReservations,
            Resource::Court { owner_id },
        ) => owns(*owner_id),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtbook_core::ErrorKind;

    fn principal(role: UserRole) -> Principal {
        Principal::new(UserId::new(), role)
    }

    #[test]
    fn test_any_role_can_book() {
        let court = Resource::Court {
            owner_id: UserId::new(),
        };
        for role in [UserRole::User, UserRole::CourtOwner, UserRole::Admin] {
            assert!(is_allowed(&principal(role), &court, Action::BookSlot));
        }
    }

    #[test]
    fn test_only_owner_or_admin_manage_court() {
        let owner = principal(UserRole::CourtOwner);
        let court = Resource::Court {
            owner_id: owner.user_id,
        };

        assert!(is_allowed(&owner, &court, Action::ManageCourt));
        assert!(is_allowed(&owner, &court, Action::ManageSchedule));
        assert!(is_allowed(&principal(UserRole::Admin), &court, Action::ManageCourt));
        assert!(!is_allowed(&principal(UserRole::CourtOwner), &court, Action::ManageCourt));
        assert!(!is_allowed(&principal(UserRole::User), &court, Action::ManageSchedule));
    }

    #[test]
    fn test_demoted_owner_loses_management() {
        let former = principal(UserRole::User);
        let court = Resource::Court {
            owner_id: former.user_id,
        };
        assert!(!is_allowed(&former, &court, Action::ManageCourt));
    }

    #[test]
    fn test_cancel_rules() {
        let booker = principal(UserRole::User);
        let owner = principal(UserRole::CourtOwner);
        let reservation = Resource::Reservation {
            user_id: booker.user_id,
            court_owner_id: owner.user_id,
        };

        assert!(is_allowed(&booker, &reservation, Action::CancelReservation));
        assert!(is_allowed(&owner, &reservation, Action::CancelReservation));
        assert!(is_allowed(
            &principal(UserRole::Admin),
            &reservation,
            Action::CancelReservation
        ));

        let err = authorize(
            &principal(UserRole::User),
            &reservation,
            Action::CancelReservation,
        )
        .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[test]
    fn test_admin_only_actions() {
        let owner = principal(UserRole::CourtOwner);
        let court = Resource::Court {
            owner_id: owner.user_id,
        };
        assert!(!is_allowed(&owner, &court, Action::ReassignCourtOwner));
        assert!(!is_allowed(&owner, &Resource::System, Action::AdminSearch));
        assert!(is_allowed(&owner, &Resource::System, Action::CreateCourt));
        assert!(!is_allowed(&principal(UserRole::User), &Resource::System, Action::CreateCourt));
    }
}
