//! Reservation, absence and slot models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bookable unit of a desk-day. Deployments use either the half-day
/// model (AM/PM) or the full-day model (FULL only); FULL submitted to a
/// half-day server is expanded to AM+PM server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
    #[serde(rename = "FULL")]
    Full,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Am => "AM",
            Slot::Pm => "PM",
            Slot::Full => "FULL",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Slot::Am),
            "PM" => Ok(Slot::Pm),
            "FULL" => Ok(Slot::Full),
            other => Err(format!("unknown slot '{}' (expected AM, PM or FULL)", other)),
        }
    }
}

/// A reservation of one desk for one date and slot. `auto` marks a row the
/// server synthesized from a named desk's default occupancy rather than an
/// explicit booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: String,
    pub user_id: String,
    pub desk_id: String,
    pub date: NaiveDate,
    pub slot: Slot,
    #[serde(default)]
    pub auto: bool,
}

impl Reservation {
    /// Chronological sort key: ISO date then slot, lexicographic.
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.date, self.slot)
    }
}

/// A named-desk absence override, keyed by (desk, date, slot).
/// `released = true` means the owner will not use the desk for that slot,
/// permitting the server to auto-book it for someone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Absence {
    pub desk_id: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub released: bool,
}

/// Aggregate counters from the admin stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_reservations: u64,
    pub active_users: u64,
    pub enabled_desks: u64,
}
