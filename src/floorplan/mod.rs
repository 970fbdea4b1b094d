//! Floor plan configuration and seat-map derivation
//!
//! The physical grid shape and the name→position table for named desks are
//! deployment data, not server data: a compiled-in default ships with the
//! binary and the config file may override it. Both are validated before use.

mod layout;
mod occupancy;

pub use layout::{layout, Cell, Grid, Tile};
pub use occupancy::{day_state, resolve, DayState, Occupancy};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A named seat entry: a person's display name pinned to a grid position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedSeat {
    pub name: String,
    pub position: String,
}

/// The fixed physical grid: cell positions in iteration order, plus the
/// hand-curated table of named-desk owners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    pub positions: Vec<String>,
    #[serde(default)]
    pub named: Vec<NamedSeat>,
}

#[derive(Debug, Error)]
pub enum FloorPlanError {
    #[error("floor plan has no positions")]
    Empty,
    #[error("duplicate position '{0}'")]
    DuplicatePosition(String),
    #[error("named seat '{name}' points at unknown position '{position}'")]
    UnknownPosition { name: String, position: String },
    #[error("position '{0}' is assigned to more than one name")]
    PositionConflict(String),
    #[error("name '{0}' appears more than once in the seat table")]
    DuplicateName(String),
}

/// Normalization applied to owner display names before table lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FloorPlan {
    /// Check structural soundness. Run at config load; a plan that fails
    /// here must never reach the layout engine.
    pub fn validate(&self) -> Result<(), FloorPlanError> {
        if self.positions.is_empty() {
            return Err(FloorPlanError::Empty);
        }
        let mut seen = HashSet::new();
        for pos in &self.positions {
            if !seen.insert(pos.as_str()) {
                return Err(FloorPlanError::DuplicatePosition(pos.clone()));
            }
        }
        let mut taken = HashSet::new();
        let mut names = HashSet::new();
        for seat in &self.named {
            if !seen.contains(seat.position.as_str()) {
                return Err(FloorPlanError::UnknownPosition {
                    name: seat.name.clone(),
                    position: seat.position.clone(),
                });
            }
            if !taken.insert(seat.position.as_str()) {
                return Err(FloorPlanError::PositionConflict(seat.position.clone()));
            }
            if !names.insert(normalize_name(&seat.name)) {
                return Err(FloorPlanError::DuplicateName(seat.name.clone()));
            }
        }
        Ok(())
    }
}

impl Default for FloorPlan {
    /// The default office: a 4x4 grid, window row first, with the
    /// long-standing named seats along the window.
    fn default() -> Self {
        let positions = ["A", "B", "C", "D"]
            .iter()
            .flat_map(|row| (1..=4).map(move |col| format!("{}{}", row, col)))
            .collect();
        let named = [
            ("Mira Solberg", "A1"),
            ("Jonas Beck", "A2"),
            ("Priya Nair", "A3"),
            ("Tomas Varga", "B1"),
            ("Lena Hoff", "B2"),
        ]
        .iter()
        .map(|(name, position)| NamedSeat {
            name: name.to_string(),
            position: position.to_string(),
        })
        .collect();
        Self { positions, named }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_is_valid() {
        FloorPlan::default().validate().unwrap();
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Bob "), "bob");
        assert_eq!(normalize_name("Mira SOLBERG"), "mira solberg");
    }

    #[test]
    fn test_rejects_unknown_position() {
        let plan = FloorPlan {
            positions: vec!["A1".into()],
            named: vec![NamedSeat {
                name: "Bob".into(),
                position: "Z9".into(),
            }],
        };
        assert!(matches!(
            plan.validate(),
            Err(FloorPlanError::UnknownPosition { .. })
        ));
    }

    #[test]
    fn test_rejects_position_conflict() {
        let plan = FloorPlan {
            positions: vec!["A1".into(), "A2".into()],
            named: vec![
                NamedSeat {
                    name: "Bob".into(),
                    position: "A1".into(),
                },
                NamedSeat {
                    name: "Alice".into(),
                    position: "A1".into(),
                },
            ],
        };
        assert!(matches!(
            plan.validate(),
            Err(FloorPlanError::PositionConflict(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_name_after_normalization() {
        let plan = FloorPlan {
            positions: vec!["A1".into(), "A2".into()],
            named: vec![
                NamedSeat {
                    name: "Bob".into(),
                    position: "A1".into(),
                },
                NamedSeat {
                    name: " BOB ".into(),
                    position: "A2".into(),
                },
            ],
        };
        assert!(matches!(
            plan.validate(),
            Err(FloorPlanError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_grid_position() {
        let plan = FloorPlan {
            positions: vec!["A1".into(), "A1".into()],
            named: vec![],
        };
        assert!(matches!(
            plan.validate(),
            Err(FloorPlanError::DuplicatePosition(_))
        ));
    }
}
