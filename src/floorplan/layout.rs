//! Seat-map layout engine
//!
//! Places desks onto the fixed grid: named desks go to their configured
//! positions, the rest fill remaining cells in label order, and anything
//! left over lands in the overflow list. Pure function of the snapshot
//! slices; recomputed on every render.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use super::occupancy::{day_state, resolve, DayState, Occupancy};
use super::{normalize_name, FloorPlan};
use crate::models::{Desk, Reservation, Slot, User};

/// One populated seat: what the renderer needs to draw it.
#[derive(Debug, Clone)]
pub struct Tile {
    pub desk_id: String,
    /// Owner name for named desks, desk label otherwise.
    pub title: String,
    pub subtitle: String,
    pub selected: bool,
    pub day: DayState,
    pub slots: Vec<(Slot, Occupancy)>,
}

/// One fixed grid cell; empty when no desk maps to it.
#[derive(Debug, Clone)]
pub struct Cell {
    pub position: String,
    pub tile: Option<Tile>,
}

/// The derived seat map: fixed cells in iteration order plus the ordered
/// overflow list for desks that did not fit.
#[derive(Debug, Clone)]
pub struct Grid {
    pub cells: Vec<Cell>,
    pub overflow: Vec<Tile>,
}

/// Case-insensitive label ordering with the exact label as tie-breaker,
/// so placement is stable across refreshes.
fn label_key(desk: &Desk) -> (String, String) {
    (desk.label.to_lowercase(), desk.label.clone())
}

fn make_tile(
    desk: &Desk,
    title: &str,
    reservations: &[Reservation],
    users: &[User],
    date: NaiveDate,
    slots: &[Slot],
    selected_desk: Option<&str>,
) -> Tile {
    let per_slot = slots
        .iter()
        .map(|&slot| {
            (
                slot,
                resolve(reservations, users, &desk.desk_id, date, slot),
            )
        })
        .collect();
    Tile {
        desk_id: desk.desk_id.clone(),
        title: title.to_string(),
        subtitle: desk.label.clone(),
        selected: selected_desk == Some(desk.desk_id.as_str()),
        day: day_state(reservations, users, &desk.desk_id, date, slots),
        slots: per_slot,
    }
}

/// Lay the desk list onto the floor plan for one date.
pub fn layout(
    plan: &FloorPlan,
    desks: &[Desk],
    users: &[User],
    reservations: &[Reservation],
    date: NaiveDate,
    slots: &[Slot],
    selected_desk: Option<&str>,
) -> Grid {
    // Reverse index: normalized owner display name -> desk. Only desks
    // whose owner resolves in the current snapshot participate.
    let users_by_id: HashMap<&str, &User> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();
    let mut by_owner_name: HashMap<String, (&Desk, &User)> = HashMap::new();
    for desk in desks {
        if let Some(owner_id) = desk.owner_user_id.as_deref() {
            if let Some(owner) = users_by_id.get(owner_id).copied() {
                by_owner_name
                    .entry(normalize_name(owner.identity()))
                    .or_insert((desk, owner));
            }
        }
    }

    // Named placement from the static table.
    let mut placed: HashSet<&str> = HashSet::new();
    let mut tiles_by_position: HashMap<&str, Tile> = HashMap::new();
    for seat in &plan.named {
        if let Some(&(desk, owner)) = by_owner_name.get(normalize_name(&seat.name).as_str()) {
            tiles_by_position.insert(
                seat.position.as_str(),
                make_tile(
                    desk,
                    owner.identity(),
                    reservations,
                    users,
                    date,
                    slots,
                    selected_desk,
                ),
            );
            placed.insert(desk.desk_id.as_str());
        }
    }

    // Remaining desks in stable label order.
    let mut rest: Vec<&Desk> = desks
        .iter()
        .filter(|d| !placed.contains(d.desk_id.as_str()))
        .collect();
    rest.sort_by_key(|d| label_key(d));
    let mut rest = rest.into_iter();

    let cells = plan
        .positions
        .iter()
        .map(|position| {
            let tile = tiles_by_position.remove(position.as_str()).or_else(|| {
                rest.next().map(|desk| {
                    make_tile(
                        desk,
                        &desk.label,
                        reservations,
                        users,
                        date,
                        slots,
                        selected_desk,
                    )
                })
            });
            Cell {
                position: position.clone(),
                tile,
            }
        })
        .collect();

    let overflow = rest
        .map(|desk| {
            make_tile(
                desk,
                &desk.label,
                reservations,
                users,
                date,
                slots,
                selected_desk,
            )
        })
        .collect();

    Grid { cells, overflow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floorplan::NamedSeat;

    fn user(id: &str, name: &str) -> User {
        User {
            user_id: id.into(),
            email: None,
            name: Some(name.into()),
            enabled: true,
            is_admin: false,
        }
    }

    fn desk(id: &str, label: &str, owner: Option<&str>) -> Desk {
        Desk {
            desk_id: id.into(),
            label: label.into(),
            enabled: true,
            owner_user_id: owner.map(String::from),
        }
    }

    fn plan(positions: &[&str], named: &[(&str, &str)]) -> FloorPlan {
        FloorPlan {
            positions: positions.iter().map(|s| s.to_string()).collect(),
            named: named
                .iter()
                .map(|(name, position)| NamedSeat {
                    name: name.to_string(),
                    position: position.to_string(),
                })
                .collect(),
        }
    }

    fn date() -> NaiveDate {
        "2024-01-02".parse().unwrap()
    }

    const SLOTS: [Slot; 2] = [Slot::Am, Slot::Pm];

    fn cell_desk<'a>(grid: &'a Grid, position: &str) -> Option<&'a str> {
        grid.cells
            .iter()
            .find(|c| c.position == position)
            .and_then(|c| c.tile.as_ref())
            .map(|t| t.desk_id.as_str())
    }

    #[test]
    fn test_named_desk_placed_at_configured_position() {
        let desks = [desk("d1", "Alpha", None), desk("d2", "Beta", Some("u9"))];
        let users = [user("u9", "Bob")];
        let p = plan(&["A1", "A2", "A3"], &[("bob", "A1")]);
        let grid = layout(&p, &desks, &users, &[], date(), &SLOTS, None);

        assert_eq!(cell_desk(&grid, "A1"), Some("d2"));
        assert_eq!(cell_desk(&grid, "A2"), Some("d1"));
        assert_eq!(cell_desk(&grid, "A3"), None);
        assert!(grid.overflow.is_empty());

        let named = grid.cells[0].tile.as_ref().unwrap();
        assert_eq!(named.title, "Bob");
        assert_eq!(named.subtitle, "Beta");
    }

    #[test]
    fn test_unnamed_desks_fill_in_label_order_then_overflow() {
        let desks = [
            desk("d3", "gamma", None),
            desk("d1", "Alpha", None),
            desk("d2", "Beta", None),
        ];
        let p = plan(&["A1", "A2"], &[]);
        let grid = layout(&p, &desks, &[], &[], date(), &SLOTS, None);

        assert_eq!(cell_desk(&grid, "A1"), Some("d1"));
        assert_eq!(cell_desk(&grid, "A2"), Some("d2"));
        assert_eq!(grid.overflow.len(), 1);
        assert_eq!(grid.overflow[0].desk_id, "d3");
    }

    #[test]
    fn test_layout_is_deterministic() {
        let desks = [
            desk("d2", "Beta", Some("u9")),
            desk("d1", "Alpha", None),
            desk("d3", "Gamma", None),
        ];
        let users = [user("u9", "Bob")];
        let p = plan(&["A1", "A2"], &[("Bob", "A2")]);

        let a = layout(&p, &desks, &users, &[], date(), &SLOTS, None);
        let b = layout(&p, &desks, &users, &[], date(), &SLOTS, None);
        let ids = |g: &Grid| {
            g.cells
                .iter()
                .map(|c| c.tile.as_ref().map(|t| t.desk_id.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(
            a.overflow.iter().map(|t| &t.desk_id).collect::<Vec<_>>(),
            b.overflow.iter().map(|t| &t.desk_id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unresolvable_table_name_falls_back_to_label_fill() {
        let desks = [desk("d1", "Alpha", None)];
        let p = plan(&["A1", "A2"], &[("nobody", "A1")]);
        let grid = layout(&p, &desks, &[], &[], date(), &SLOTS, None);

        // The table entry resolves to nothing, so A1 is treated like any
        // unfilled cell and takes the first desk in label order.
        assert_eq!(cell_desk(&grid, "A1"), Some("d1"));
        assert_eq!(cell_desk(&grid, "A2"), None);
    }

    #[test]
    fn test_owner_without_snapshot_user_is_not_named() {
        let desks = [desk("d2", "Beta", Some("missing")), desk("d1", "Alpha", None)];
        let p = plan(&["A1", "A2"], &[("bob", "A1")]);
        let grid = layout(&p, &desks, &[], &[], date(), &SLOTS, None);

        // Both desks fall through to label-ordered fill.
        assert_eq!(cell_desk(&grid, "A1"), Some("d1"));
        assert_eq!(cell_desk(&grid, "A2"), Some("d2"));
    }

    #[test]
    fn test_selected_flag_follows_desk_id() {
        let desks = [desk("d1", "Alpha", None)];
        let p = plan(&["A1"], &[]);
        let grid = layout(&p, &desks, &[], &[], date(), &SLOTS, Some("d1"));
        assert!(grid.cells[0].tile.as_ref().unwrap().selected);

        let grid = layout(&p, &desks, &[], &[], date(), &SLOTS, Some("other"));
        assert!(!grid.cells[0].tile.as_ref().unwrap().selected);
    }

    #[test]
    fn test_tile_carries_per_slot_occupancy() {
        let desks = [desk("d1", "Alpha", None)];
        let users = [user("u1", "Ana")];
        let reservations = [Reservation {
            reservation_id: "r1".into(),
            user_id: "u1".into(),
            desk_id: "d1".into(),
            date: date(),
            slot: Slot::Am,
            auto: false,
        }];
        let p = plan(&["A1"], &[]);
        let grid = layout(&p, &desks, &users, &reservations, date(), &SLOTS, None);

        let tile = grid.cells[0].tile.as_ref().unwrap();
        assert_eq!(tile.day, DayState::Manual);
        assert_eq!(
            tile.slots,
            vec![
                (Slot::Am, Occupancy::ManuallyBooked("Ana".into())),
                (Slot::Pm, Occupancy::Free),
            ]
        );
    }
}
