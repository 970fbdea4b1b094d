//! Desk model

use serde::{Deserialize, Serialize};

/// A bookable desk. A desk with `owner_user_id` set is a "named desk":
/// the floor plan displays it by owner name, and its owner may release it
/// for a slot via an absence record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Desk {
    pub desk_id: String,
    pub label: String,
    pub enabled: bool,
    pub owner_user_id: Option<String>,
}

impl Desk {
    /// Picker display string: label plus a short id prefix to disambiguate
    /// duplicate labels.
    pub fn display(&self) -> String {
        let prefix: String = self.desk_id.chars().take(6).collect();
        format!("{} ({})", self.label, prefix)
    }
}
