//! Default configuration values, referenced from `#[serde(default = ...)]`.

use std::path::PathBuf;

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Media players that are known to flood the notification server.
pub(super) fn default_throttled_applications() -> Vec<String> {
    vec!["Clementine".to_string(), "Spotify".to_string()]
}

pub(super) fn default_unknown_application_name() -> String {
    "Unknown Application".to_string()
}

pub(super) fn default_event_buffer() -> usize {
    64
}
