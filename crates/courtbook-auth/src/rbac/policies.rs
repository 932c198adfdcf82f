//! The authorization vocabulary: who acts, on what, doing what.

use serde::{Deserialize, Serialize};

use courtbook_core::types::UserId;
use courtbook_entity::court::Court;
use courtbook_entity::reservation::Reservation;
use courtbook_entity::user::UserRole;

/// The authenticated actor of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The acting user.
    pub user_id: UserId,
    /// The actor's role.
    pub role: UserRole,
}

impl Principal {
    /// Creates a principal.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether the actor is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Claim a slot on a court.
    BookSlot,
    /// Cancel a reservation.
    CancelReservation,
    /// Register a new court.
    CreateCourt,
    /// List the courts one owns.
    ListOwnedCourts,
    /// Edit, activate, deactivate or delete a court.
    ManageCourt,
    /// Hand a court over to another owner.
    ReassignCourtOwner,
    /// Block hours and edit the whitelist of a court.
    ManageSchedule,
    /// See every reservation and the occupancy of a court.
    ViewCourtReservations,
    /// Search all courts regardless of owner or state.
    AdminSearch,
}

/// The target of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    /// System-wide actions with no specific target.
    System,
    /// A court and its owner.
    Court {
        /// The court's owner.
        owner_id: UserId,
    },
    /// A reservation, its booking user and the owner of its court.
    Reservation {
        /// The booking user.
        user_id: UserId,
        /// The owner of the booked court.
        court_owner_id: UserId,
    },
}

impl Resource {
    /// The resource describing a court.
    pub fn court(court: &Court) -> Self {
        Self::Court {
            owner_id: court.owner_id,
        }
    }

    /// The resource describing a reservation on a court.
    pub fn reservation(reservation: &Reservation, court: &Court) -> Self {
        Self::Reservation {
            user_id: reservation.user_id,
            court_owner_id: court.owner_id,
        }
    }
}
