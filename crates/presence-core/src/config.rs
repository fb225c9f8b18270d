//! Configuration types for presence checking
//!
//! This module provides configuration structures for the office geofence,
//! the fake-location block list, the HTTP server and logging.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::authenticity::SpoofingAppList;
use crate::error::{PresenceError, Result};
use crate::geofence::{OfficeGeofence, RemoteOfficeSettings, DEFAULT_START_TIME};
use crate::presence::PresenceGate;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Office geofence
    pub office: OfficeGeofence,
    /// Scheduled start of the working day (`HH:MM`)
    pub start_time: String,
    /// Fake-location detection settings
    pub authenticity: AuthenticityConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            office: OfficeGeofence::default(),
            start_time: DEFAULT_START_TIME.to_string(),
            authenticity: AuthenticityConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => PresenceError::ConfigNotFound(path.display().to_string()),
        _ => err.into(),
    })
}

impl PresenceConfig {
    /// Load a JSON configuration file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = serde_json::from_str(&read_config_file(path)?)?;
        config.validate()?;
        debug!(path = %path.display(), office = %config.office.name, "Configuration loaded");
        Ok(config)
    }

    /// Replace the office geofence and start time with remote settings
    pub fn apply_remote(&mut self, settings: &RemoteOfficeSettings) {
        self.office = OfficeGeofence::from_remote(settings);
        self.start_time = settings.start_time().to_string();
        debug!(
            office = %self.office.name,
            max_radius_m = self.office.max_radius_m,
            start_time = %self.start_time,
            "Remote office settings applied"
        );
    }

    /// Apply a JSON file holding the remote office settings record
    pub fn apply_remote_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let settings: RemoteOfficeSettings =
            serde_json::from_str(&read_config_file(path.as_ref())?)?;
        self.apply_remote(&settings);
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        self.office
            .validate()
            .map_err(|err| PresenceError::InvalidConfig(format!("office: {err}")))?;
        if self.server.request_timeout.is_zero() {
            return Err(PresenceError::InvalidConfig(
                "server.request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Gate built from the office and block list settings
    pub fn gate(&self) -> PresenceGate {
        PresenceGate::new(self.office.clone(), self.authenticity.spoofing_apps.clone())
    }
}

/// Fake-location detection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticityConfig {
    /// Package identifiers of fake-GPS apps
    #[serde(default)]
    pub spoofing_apps: SpoofingAppList,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// HTTP port (0 = auto-assign)
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Per-request timeout
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// Display name reported by `/api/info`
    #[serde(default = "default_node_name")]
    pub name: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_node_name() -> String {
    "presence-node".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            http_port: default_http_port(),
            request_timeout: default_request_timeout(),
            name: default_node_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    /// Log format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_format() -> LogFormat {
    LogFormat::Full
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-field human-readable format
    Full,
    /// Compact single-line format
    Compact,
}

// Helper module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
