//! XDG base directory and application path resolution.
//!
//! Built on `directories-next`. The daemon keeps its files under a lowercase
//! `novade` directory inside each XDG base directory:
//!
//! - config: `$XDG_CONFIG_HOME/novade/notifications.toml`
//! - state:  `$XDG_STATE_HOME/novade/` (relative log file paths resolve here)
//!
//! The system-wide configuration lives at `/etc/novade/notifications.toml` and
//! can be redirected with the `NOVADE_NOTIFICATIONS_SYSTEM_CONFIG` environment
//! variable.

use crate::error::{ConfigError, CoreError};
use directories_next::BaseDirs;
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "novade";

/// File name of the notification daemon configuration, both user and system.
pub const CONFIG_FILE_NAME: &str = "notifications.toml";

/// Environment variable overriding the system configuration path.
pub const SYSTEM_CONFIG_ENV: &str = "NOVADE_NOTIFICATIONS_SYSTEM_CONFIG";

const DEFAULT_SYSTEM_CONFIG_PATH: &str = "/etc/novade/notifications.toml";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable {
        dir_type: dir_type.to_string(),
    })
}

/// Returns `$XDG_CONFIG_HOME` (usually `~/.config`).
pub fn get_config_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("Config Base"))
}

/// Returns `$XDG_DATA_HOME` (usually `~/.local/share`).
pub fn get_data_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| unavailable("Data Base"))
}

/// Returns `$XDG_STATE_HOME`, falling back to `~/.local/state`.
///
/// `directories-next` has no state directory on `BaseDirs`, so the variable is
/// read directly on Linux; other platforms use the local data directory.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    let dirs = BaseDirs::new().ok_or_else(|| unavailable("State Base"))?;
    #[cfg(target_os = "linux")]
    {
        match env::var("XDG_STATE_HOME") {
            Ok(state_home) if !state_home.is_empty() => Ok(PathBuf::from(state_home)),
            _ => Ok(dirs.home_dir().join(".local").join("state")),
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        Ok(dirs.data_local_dir().to_path_buf())
    }
}

/// Returns the daemon's user configuration directory, e.g. `~/.config/novade`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    get_config_base_dir().map(|base| base.join(APP_DIR))
}

/// Returns the daemon's state directory, e.g. `~/.local/state/novade`.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base| base.join(APP_DIR))
}

/// Returns the path of the user configuration file.
pub fn get_user_config_path() -> Result<PathBuf, CoreError> {
    get_app_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Returns the path of the system configuration file, honouring
/// [`SYSTEM_CONFIG_ENV`].
pub fn get_system_config_path() -> PathBuf {
    env::var_os(SYSTEM_CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_CONFIG_PATH))
}
