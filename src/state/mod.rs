//! Session/view state: the fetched snapshot and its derived read views
//!
//! A snapshot is fetched wholesale (four concurrent reads, all-or-nothing)
//! and replaced wholesale after every successful mutation. Nothing in the
//! client patches a snapshot in place.

use chrono::{Duration, Local, NaiveDate};

use crate::api::{ApiError, DeskClient};
use crate::models::{Desk, Reservation, User};

/// The rolling booking window: `today` through six days ahead, inclusive.
pub fn booking_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(6))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One internally consistent view generation. Either all four collections
/// are from the same refresh or the snapshot does not exist.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub me: User,
    pub users: Vec<User>,
    pub desks: Vec<Desk>,
    pub reservations: Vec<Reservation>,
}

impl Snapshot {
    /// Fetch all four collections concurrently; any failure fails the
    /// whole refresh so a half-updated view is never observable.
    pub async fn fetch(client: &DeskClient) -> Result<Self, ApiError> {
        let (start, end) = booking_window(today());
        let (me, users, desks, reservations) = tokio::try_join!(
            client.me(),
            client.users(),
            client.desks(),
            client.reservations(start, end),
        )?;
        Ok(Self {
            me,
            users,
            desks,
            reservations,
        })
    }
}

/// Client-local view state on top of the snapshot. Desk selection is pure
/// local state; it never causes a server call by itself.
#[derive(Debug)]
pub struct AppState {
    pub snapshot: Snapshot,
    pub selected_desk: Option<String>,
    pub selected_date: NaiveDate,
}

impl AppState {
    pub fn new(snapshot: Snapshot, selected_date: NaiveDate) -> Self {
        Self {
            snapshot,
            selected_desk: None,
            selected_date,
        }
    }

    /// Replace-on-refresh: the previous snapshot is dropped entirely.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    pub fn select_desk(&mut self, desk_id: Option<String>) {
        self.selected_desk = desk_id;
    }

    pub fn session_banner(&self) -> String {
        format!(
            "{} | {}",
            self.snapshot.me.identity(),
            self.snapshot.me.role()
        )
    }

    /// Explicit bookings of the current user, chronological. Auto-created
    /// rows are never listed as "mine" -- they are not cancellable bookings.
    pub fn my_reservations(&self) -> Vec<&Reservation> {
        let mut mine: Vec<&Reservation> = self
            .snapshot
            .reservations
            .iter()
            .filter(|r| r.user_id == self.snapshot.me.user_id && !r.auto)
            .collect();
        mine.sort_by_key(|r| r.sort_key());
        mine
    }

    /// Admin views are gated strictly on the current user's flag.
    pub fn admin_visible(&self) -> bool {
        self.snapshot.me.is_admin
    }

    /// Desks owned by the current user; only these accept absence edits.
    pub fn owned_desks(&self) -> Vec<&Desk> {
        self.snapshot
            .desks
            .iter()
            .filter(|d| d.owner_user_id.as_deref() == Some(self.snapshot.me.user_id.as_str()))
            .collect()
    }

    /// Desk label for display, degrading to the raw id on a stale reference.
    pub fn desk_label<'a>(&'a self, desk_id: &'a str) -> &'a str {
        self.snapshot
            .desks
            .iter()
            .find(|d| d.desk_id == desk_id)
            .map(|d| d.label.as_str())
            .unwrap_or(desk_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slot;

    fn me() -> User {
        User {
            user_id: "u1".into(),
            email: Some("me@example.com".into()),
            name: None,
            enabled: true,
            is_admin: false,
        }
    }

    fn reservation(id: &str, user: &str, date: &str, slot: Slot, auto: bool) -> Reservation {
        Reservation {
            reservation_id: id.into(),
            user_id: user.into(),
            desk_id: "d1".into(),
            date: date.parse().unwrap(),
            slot,
            auto,
        }
    }

    fn state(reservations: Vec<Reservation>) -> AppState {
        AppState::new(
            Snapshot {
                me: me(),
                users: vec![me()],
                desks: vec![],
                reservations,
            },
            "2024-01-02".parse().unwrap(),
        )
    }

    #[test]
    fn test_booking_window_spans_seven_days() {
        let (start, end) = booking_window("2024-01-01".parse().unwrap());
        assert_eq!(start.to_string(), "2024-01-01");
        assert_eq!(end.to_string(), "2024-01-07");
    }

    #[test]
    fn test_my_reservations_excludes_auto_and_others() {
        let s = state(vec![
            reservation("r1", "u1", "2024-01-03", Slot::Pm, false),
            reservation("r2", "u1", "2024-01-03", Slot::Am, true),
            reservation("r3", "u2", "2024-01-02", Slot::Am, false),
            reservation("r4", "u1", "2024-01-02", Slot::Am, false),
        ]);
        let ids: Vec<&str> = s
            .my_reservations()
            .iter()
            .map(|r| r.reservation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["r4", "r1"]);
    }

    #[test]
    fn test_my_reservations_sorted_by_date_then_slot() {
        let s = state(vec![
            reservation("r1", "u1", "2024-01-03", Slot::Am, false),
            reservation("r2", "u1", "2024-01-02", Slot::Pm, false),
            reservation("r3", "u1", "2024-01-02", Slot::Am, false),
        ]);
        let ids: Vec<&str> = s
            .my_reservations()
            .iter()
            .map(|r| r.reservation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["r3", "r2", "r1"]);
    }

    #[test]
    fn test_session_banner_and_admin_gate() {
        let mut s = state(vec![]);
        assert_eq!(s.session_banner(), "me@example.com | user");
        assert!(!s.admin_visible());
        s.snapshot.me.is_admin = true;
        assert!(s.admin_visible());
        assert_eq!(s.session_banner(), "me@example.com | admin");
    }

    #[test]
    fn test_desk_label_falls_back_to_raw_id() {
        let s = state(vec![]);
        assert_eq!(s.desk_label("ghost"), "ghost");
    }

    #[test]
    fn test_owned_desks() {
        let mut s = state(vec![]);
        s.snapshot.desks = vec![
            Desk {
                desk_id: "d1".into(),
                label: "Alpha".into(),
                enabled: true,
                owner_user_id: Some("u1".into()),
            },
            Desk {
                desk_id: "d2".into(),
                label: "Beta".into(),
                enabled: true,
                owner_user_id: Some("u2".into()),
            },
            Desk {
                desk_id: "d3".into(),
                label: "Gamma".into(),
                enabled: true,
                owner_user_id: None,
            },
        ];
        let owned: Vec<&str> = s.owned_desks().iter().map(|d| d.desk_id.as_str()).collect();
        assert_eq!(owned, vec!["d1"]);
    }

    #[test]
    fn test_selection_is_local_state() {
        let mut s = state(vec![]);
        assert!(s.selected_desk.is_none());
        s.select_desk(Some("d1".into()));
        assert_eq!(s.selected_desk.as_deref(), Some("d1"));
        s.select_desk(None);
        assert!(s.selected_desk.is_none());
    }
}
