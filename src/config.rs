use serde::Deserialize;
use std::path::Path;

use crate::models::LatLng;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the route backend, e.g. "https://api.example.com/api/".
    pub api_base_url: String,
    /// Geolocation acquisition tuning.
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// Path of the on-disk credential store.
    #[serde(default = "Config::default_store_path")]
    pub store_path: String,
    /// Fixed viewer position for the headless runner. Hosts with a real
    /// device feed positions through the geolocation provider instead.
    #[serde(default)]
    pub viewer_position: Option<LatLng>,
}

/// Tuning for device position acquisition
#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationConfig {
    /// Accuracy radius (meters) good enough to stop the watch early (default: 15)
    #[serde(default = "GeolocationConfig::default_accuracy_target_m")]
    pub accuracy_target_m: f64,
    /// How long to wait for an accurate fix before settling for the best
    /// one seen so far (default: 5000 ms)
    #[serde(default = "GeolocationConfig::default_watch_deadline_ms")]
    pub watch_deadline_ms: u64,
    /// Timeout for the one-shot fallback query (default: 20000 ms)
    #[serde(default = "GeolocationConfig::default_one_shot_timeout_ms")]
    pub one_shot_timeout_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            accuracy_target_m: Self::default_accuracy_target_m(),
            watch_deadline_ms: Self::default_watch_deadline_ms(),
            one_shot_timeout_ms: Self::default_one_shot_timeout_ms(),
        }
    }
}

impl GeolocationConfig {
    fn default_accuracy_target_m() -> f64 {
        15.0
    }
    fn default_watch_deadline_ms() -> u64 {
        5000
    }
    fn default_one_shot_timeout_ms() -> u64 {
        20000
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn validate(&self) {
        if self.api_base_url.trim().is_empty() {
            panic!("Configuration error: 'api_base_url' must not be empty");
        }
        if self.geolocation.watch_deadline_ms == 0 {
            panic!("Configuration error: 'geolocation.watch_deadline_ms' must be greater than zero");
        }
    }

    fn default_store_path() -> String {
        "rutero.db".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
