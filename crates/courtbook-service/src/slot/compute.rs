//! Pure slot computation: candidates minus blocks and active reservations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use courtbook_core::types::HourLabel;

/// State of one hour in a resolved day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Free to book.
    Available,
    /// Held by an active reservation.
    Reserved,
    /// Withdrawn by the owner.
    Blocked,
}

/// One resolved hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot start.
    pub hour: HourLabel,
    /// Slot state.
    pub state: SlotState,
}

impl Slot {
    /// Whether the slot can be claimed.
    pub fn is_available(&self) -> bool {
        self.state == SlotState::Available
    }
}

/// Classify each candidate hour, ascending.
///
/// Blocked beats reserved. Hours that are blocked or reserved but not
/// candidates are ignored. With `show_blocked` off, blocked hours are
/// dropped from the output.
pub fn compute_slots(
    candidates: &[HourLabel],
    blocked: &[HourLabel],
    reserved: &[HourLabel],
    show_blocked: bool,
) -> Vec<Slot> {
    let candidates: BTreeSet<HourLabel> = candidates.iter().copied().collect();
    let blocked: BTreeSet<HourLabel> = blocked.iter().copied().collect();
    let reserved: BTreeSet<HourLabel> = reserved.iter().copied().collect();

    candidates
        .into_iter()
        .filter_map(|hour| {
            let state = if blocked.contains(&hour) {
                SlotState::Blocked
            } else if reserved.contains(&hour) {
                SlotState::Reserved
            } else {
                SlotState::Available
            };
            (show_blocked || state != SlotState::Blocked).then_some(Slot { hour, state })
        })
        .collect()
}
