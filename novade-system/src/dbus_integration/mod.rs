// novade-system/src/dbus_integration/mod.rs

pub mod manager;

pub use manager::{DbusManagerError, DbusServiceManager, Result};
