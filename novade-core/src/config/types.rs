//! Configuration data structures for the notification daemon.
//!
//! All structs deserialize from TOML, fill absent fields from
//! [`super::defaults`], and reject unknown keys.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Settings for the logging subsystem.
///
/// ```
/// use novade_core::config::LoggingConfig;
///
/// let log_config: LoggingConfig = toml::from_str(r#"level = "debug""#).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, None);
/// assert_eq!(log_config.format, "text");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of "trace", "debug", "info", "warn", "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths resolve against the XDG state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::default_log_level(),
            file_path: defaults::default_log_file_path(),
            format: defaults::default_log_format(),
        }
    }
}

/// Behaviour of the notification broker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    /// Senders whose notifications always collapse onto a single id.
    #[serde(default = "defaults::default_throttled_applications")]
    pub throttled_applications: Vec<String>,
    /// Name reported to the presentation layer when a client sends an empty
    /// application name.
    #[serde(default = "defaults::default_unknown_application_name")]
    pub unknown_application_name: String,
    /// Capacity of the outbound event channel.
    #[serde(default = "defaults::default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            throttled_applications: defaults::default_throttled_applications(),
            unknown_application_name: defaults::default_unknown_application_name(),
            event_buffer: defaults::default_event_buffer(),
        }
    }
}

/// Root configuration of `novade-notifyd`.
///
/// ```
/// use novade_core::config::NotificationsDaemonConfig;
///
/// let config: NotificationsDaemonConfig = toml::from_str(r#"
/// [notifications]
/// throttled_applications = ["Spotify"]
/// "#).unwrap();
/// assert_eq!(config.notifications.throttled_applications, vec!["Spotify".to_string()]);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsDaemonConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}
