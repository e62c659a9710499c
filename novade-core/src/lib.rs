//! # NovaDE Core (`novade-core`)
//!
//! Foundation crate of the NovaDE notification daemon:
//!
//! - **Error handling**: [`CoreError`] with [`ConfigError`] and [`LoggingError`].
//! - **Configuration**: TOML loading with system/user layering through [`ConfigLoader`].
//! - **Logging**: `tracing` subscriber setup via [`init_logging`] and [`init_minimal_logging`].
//! - **Utilities**: XDG path resolution and filesystem helpers in [`utils`].
//!
//! ```rust,ignore
//! use novade_core::{init_logging, ConfigLoader, CoreError};
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("novade-core initialized");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, LoggingConfig, NotificationsConfig, NotificationsDaemonConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
