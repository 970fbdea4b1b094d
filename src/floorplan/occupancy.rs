//! Occupancy classification for one desk/date/slot
//!
//! Pure lookups over the current snapshot; safe to recompute on every
//! render. The server guarantees at most one reservation per
//! (desk, date, slot); if that invariant is violated a manual booking wins
//! over an auto booking, and within a class the first row in snapshot
//! order wins.

use chrono::NaiveDate;

use crate::models::{Reservation, Slot, User};

/// Tri-state occupancy of one desk slot. Occupant is the display identity
/// of the booking user, or the raw user id when the user is missing from
/// the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupancy {
    Free,
    ManuallyBooked(String),
    AutoBooked(String),
}

/// Combined per-day classification of a desk, used for seat coloring.
/// Manual takes visual precedence over auto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Free,
    Auto,
    Manual,
}

impl DayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayState::Free => "free",
            DayState::Auto => "auto",
            DayState::Manual => "manual",
        }
    }
}

fn occupant_label(users: &[User], user_id: &str) -> String {
    users
        .iter()
        .find(|u| u.user_id == user_id)
        .map(|u| u.identity().to_string())
        .unwrap_or_else(|| user_id.to_string())
}

/// Classify one desk slot against the reservation list.
pub fn resolve(
    reservations: &[Reservation],
    users: &[User],
    desk_id: &str,
    date: NaiveDate,
    slot: Slot,
) -> Occupancy {
    let mut auto_match: Option<&Reservation> = None;
    for r in reservations {
        if r.desk_id != desk_id || r.date != date || r.slot != slot {
            continue;
        }
        if !r.auto {
            return Occupancy::ManuallyBooked(occupant_label(users, &r.user_id));
        }
        if auto_match.is_none() {
            auto_match = Some(r);
        }
    }
    match auto_match {
        Some(r) => Occupancy::AutoBooked(occupant_label(users, &r.user_id)),
        None => Occupancy::Free,
    }
}

/// Combined classification across the slot model's slots for one day.
pub fn day_state(
    reservations: &[Reservation],
    users: &[User],
    desk_id: &str,
    date: NaiveDate,
    slots: &[Slot],
) -> DayState {
    let mut state = DayState::Free;
    for &slot in slots {
        match resolve(reservations, users, desk_id, date, slot) {
            Occupancy::ManuallyBooked(_) => return DayState::Manual,
            Occupancy::AutoBooked(_) => state = DayState::Auto,
            Occupancy::Free => {}
        }
    }
    state
}
