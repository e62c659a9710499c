//! Configuration management for the notification daemon.
//!
//! - [`types`]: [`NotificationsDaemonConfig`], [`LoggingConfig`], [`NotificationsConfig`].
//! - [`defaults`]: default values used by `serde` when keys are absent.
//! - [`loader`]: [`ConfigLoader`], which reads, merges and validates the TOML files.
//!
//! ```rust,ignore
//! use novade_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("throttled: {:?}", config.notifications.throttled_applications),
//!     Err(e) => {
//!         novade_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{LoggingConfig, NotificationsConfig, NotificationsDaemonConfig};
