//! Configuration loading for the notification daemon.
//!
//! [`ConfigLoader::load`] reads the system file and the user file, merges them
//! table by table (user wins), deserializes the result into
//! [`NotificationsDaemonConfig`] and validates it. Missing files are not an
//! error; the daemon then runs on defaults.

use std::collections::HashSet;
use std::path::Path;

use toml::Value;

use crate::config::NotificationsDaemonConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as nova_fs;
use crate::utils::paths::{get_app_state_dir, get_system_config_path, get_user_config_path};

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the layered system + user configuration and validates it.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] / [`CoreError::Filesystem`] when a file
    ///   exists but cannot be read.
    /// - [`ConfigError::ParseError`] for invalid TOML or unknown keys.
    /// - [`ConfigError::ValidationError`] for unusable values.
    pub fn load() -> Result<NotificationsDaemonConfig, CoreError> {
        let system_path = get_system_config_path();
        let user_path = get_user_config_path()?;
        Self::load_layered(&system_path, &user_path)
    }

    /// Loads a single explicit configuration file.
    ///
    /// Unlike [`Self::load`], a missing file is an error: the caller asked for
    /// this exact file.
    pub fn load_from_path(path: &Path) -> Result<NotificationsDaemonConfig, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: NotificationsDaemonConfig =
            toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    pub(crate) fn load_layered(
        system_path: &Path,
        user_path: &Path,
    ) -> Result<NotificationsDaemonConfig, CoreError> {
        let system_value = Self::read_toml_value(system_path)?;
        let user_value = Self::read_toml_value(user_path)?;

        let mut config = match Self::merge_toml_values(system_value, user_value) {
            Some(value) => value
                .try_into::<NotificationsDaemonConfig>()
                .map_err(ConfigError::ParseError)?,
            None => NotificationsDaemonConfig::default(),
        };

        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn read_toml_value(path: &Path) -> Result<Option<Value>, CoreError> {
        match nova_fs::read_optional_to_string(path)? {
            Some(content) => {
                let value = content
                    .parse::<Value>()
                    .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?;
                tracing::debug!("Read configuration layer from {}", path.display());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Merges two optional TOML values. `override_val` takes precedence.
    fn merge_toml_values(base: Option<Value>, override_val: Option<Value>) -> Option<Value> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(Value::Table(mut base_table)), Some(Value::Table(override_table))) => {
                Self::merge_toml_tables(&mut base_table, &override_table);
                Some(Value::Table(base_table))
            }
            (_, Some(o)) => Some(o),
        }
    }

    fn merge_toml_tables(
        base_table: &mut toml::map::Map<String, Value>,
        override_table: &toml::map::Map<String, Value>,
    ) {
        for (key, override_item) in override_table {
            match base_table.get_mut(key) {
                Some(Value::Table(bt)) if override_item.is_table() => {
                    if let Value::Table(ot) = override_item {
                        Self::merge_toml_tables(bt, ot);
                    }
                }
                Some(base_item) => *base_item = override_item.clone(),
                None => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    /// Normalizes and checks a parsed configuration.
    ///
    /// - log level and format are lowercased and must be known values;
    /// - a relative log file path is made absolute under the state directory
    ///   and its parent directory is created;
    /// - throttled application names are trimmed, must be non-empty, and are
    ///   de-duplicated keeping first occurrence order;
    /// - `event_buffer` must be positive.
    pub(crate) fn validate_config(config: &mut NotificationsDaemonConfig) -> Result<(), CoreError> {
        let level = config.logging.level.to_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))
                .into());
            }
        }

        let format = config.logging.format.to_lowercase();
        match format.as_str() {
            "text" | "json" => config.logging.format = format,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))
                .into());
            }
        }

        if let Some(path) = config.logging.file_path.take() {
            let absolute = if path.is_absolute() {
                path
            } else {
                get_app_state_dir()?.join(path)
            };
            if let Some(parent) = absolute.parent() {
                if !parent.as_os_str().is_empty() {
                    nova_fs::ensure_dir_exists(parent)?;
                }
            }
            config.logging.file_path = Some(absolute);
        }

        let mut seen = HashSet::new();
        let mut throttled = Vec::with_capacity(config.notifications.throttled_applications.len());
        for name in &config.notifications.throttled_applications {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "throttled_applications must not contain empty names".to_string(),
                )
                .into());
            }
            if seen.insert(name.to_string()) {
                throttled.push(name.to_string());
            }
        }
        config.notifications.throttled_applications = throttled;

        if config.notifications.event_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "event_buffer must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
