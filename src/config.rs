//! Application configuration.

use crate::consts::cli_consts::polling::{
    CASHIERS_INTERVAL_SECS, METRICS_INTERVAL_SECS, STATUS_INTERVAL_SECS,
};
use crate::navigation::Role;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, path::Path};

/// Location of the config file: `~/.pos-dashboard/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine the home directory",
        )
    })?;
    Ok(home.join(".pos-dashboard").join("config.json"))
}

/// Poll cadence per widget, in seconds. Zero turns periodic refresh off.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PollSettings {
    pub status_secs: u64,
    pub cashiers_secs: u64,
    pub metrics_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            status_secs: STATUS_INTERVAL_SECS,
            cashiers_secs: CASHIERS_INTERVAL_SECS,
            metrics_secs: METRICS_INTERVAL_SECS,
        }
    }
}

impl PollSettings {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_secs)
    }

    pub fn cashiers_interval(&self) -> Duration {
        Duration::from_secs(self.cashiers_secs)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_secs)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Viewer role used to filter navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Overrides the backend environment's base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub polling: PollSettings,

    /// Alternative navigation definition (JSON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Like `load_from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Remove the config file. Returns whether there was one.
    pub fn clear(path: &Path) -> Result<bool, std::io::Error> {
        if !path.ends_with("config.json") {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path must end with config.json",
            ));
        }
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}
