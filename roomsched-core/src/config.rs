//! Global roomsched configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RoomschedError, RoomschedResult};
use crate::schedule::ClockTime;
use crate::timetable::{Orientation, default_time_slots};

static DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides `api_url`.
pub const API_URL_ENV: &str = "ROOMSCHED_API_URL";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration at ~/.config/roomsched/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoomschedConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub default_view: Orientation,

    #[serde(default = "default_time_slots")]
    pub time_slots: Vec<ClockTime>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RoomschedConfig {
    fn default() -> Self {
        RoomschedConfig {
            api_url: default_api_url(),
            default_view: Orientation::default(),
            time_slots: default_time_slots(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RoomschedConfig {
    pub fn config_path() -> RoomschedResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RoomschedError::Config("Could not determine config directory".into()))?
            .join("roomsched");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, with the environment override applied.
    pub fn load() -> RoomschedResult<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> RoomschedResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| RoomschedError::Config(format!("Could not read {}: {e}", path.display())))?;

        let mut config: RoomschedConfig = toml::from_str(&contents)
            .map_err(|e| RoomschedError::Config(format!("Could not parse {}: {e}", path.display())))?;

        config.time_slots.sort();
        config.time_slots.dedup();
        if config.time_slots.is_empty() {
            return Err(RoomschedError::Config(format!(
                "{}: time_slots must not be empty",
                path.display()
            )));
        }

        Ok(config)
    }

    /// Replace `api_url` when an override is given and non-empty.
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// Write a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> RoomschedResult<()> {
        let contents = format!(
            "\
# roomsched configuration

# Base URL of the room-scheduling API (overridden by ${API_URL_ENV}):
# api_url = \"{DEFAULT_API_URL}\"

# Timetable orientation when --view is not given (\"week\" or \"room\"):
# default_view = \"week\"

# Timetable rows:
# time_slots = [\"08:00\", \"09:00\", \"10:00\", \"11:00\", \"12:00\", \"13:00\", \"14:00\",
#               \"15:00\", \"16:00\", \"17:00\", \"18:00\", \"19:00\", \"20:00\"]

# HTTP request timeout in seconds:
# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RoomschedError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RoomschedError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
