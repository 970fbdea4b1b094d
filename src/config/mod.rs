//! Configuration and credential storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::floorplan::FloorPlan;
use crate::models::Slot;

/// How the deployment authenticates users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStrategy {
    /// Email + one-time code sent by the server.
    #[default]
    Otp,
    /// Direct name login, no second factor.
    Name,
}

/// Which slots a desk-day is divided into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotModel {
    /// AM/PM half days.
    #[default]
    HalfDay,
    /// One FULL slot per day.
    FullDay,
}

impl SlotModel {
    /// The slots the occupancy grid is built from.
    pub fn slots(&self) -> &'static [Slot] {
        match self {
            SlotModel::HalfDay => &[Slot::Am, Slot::Pm],
            SlotModel::FullDay => &[Slot::Full],
        }
    }

    /// Slot values a booking request may carry. A half-day server also
    /// accepts FULL and expands it to AM+PM.
    pub fn request_slots(&self) -> &'static [Slot] {
        match self {
            SlotModel::HalfDay => &[Slot::Am, Slot::Pm, Slot::Full],
            SlotModel::FullDay => &[Slot::Full],
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the reservation server
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Authentication strategy of the deployment
    #[serde(default)]
    pub auth: AuthStrategy,
    /// Slot model of the deployment
    #[serde(default)]
    pub slot_model: SlotModel,
    /// Stored session token
    pub token: Option<String>,
    /// Floor plan override; the compiled-in default applies when absent
    pub floor_plan: Option<FloorPlan>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auth: AuthStrategy::default(),
            slot_model: SlotModel::default(),
            token: None,
            floor_plan: None,
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "desk-cli", "desk-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk and validate the floor plan.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let config = if path.exists() {
            let content = fs::read_to_string(&path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if let Some(plan) = &config.floor_plan {
            plan.validate().context("Invalid floor plan in config")?;
        }
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains the token)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// The effective floor plan: config override or the compiled-in default.
    pub fn floor_plan(&self) -> FloorPlan {
        self.floor_plan.clone().unwrap_or_default()
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.auth, AuthStrategy::Otp);
        assert_eq!(config.slot_model, SlotModel::HalfDay);
        assert!(config.token.is_none());
        config.floor_plan().validate().unwrap();
    }

    #[test]
    fn test_slot_model_slots() {
        assert_eq!(SlotModel::HalfDay.slots(), &[Slot::Am, Slot::Pm]);
        assert_eq!(SlotModel::FullDay.slots(), &[Slot::Full]);
        assert!(SlotModel::HalfDay.request_slots().contains(&Slot::Full));
        assert_eq!(SlotModel::FullDay.request_slots(), &[Slot::Full]);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            server_url = "https://desks.example.com"
            auth = "name"
            slot_model = "full-day"
            "#,
        )
        .unwrap();
        assert_eq!(config.server_url, "https://desks.example.com");
        assert_eq!(config.auth, AuthStrategy::Name);
        assert_eq!(config.slot_model, SlotModel::FullDay);
    }

    #[test]
    fn test_parse_floor_plan_override() {
        let config: Config = toml::from_str(
            r#"
            [floor_plan]
            positions = ["A1", "A2"]

            [[floor_plan.named]]
            name = "Bob"
            position = "A1"
            "#,
        )
        .unwrap();
        let plan = config.floor_plan();
        assert_eq!(plan.positions, vec!["A1", "A2"]);
        assert_eq!(plan.named.len(), 1);
        plan.validate().unwrap();
    }
}
