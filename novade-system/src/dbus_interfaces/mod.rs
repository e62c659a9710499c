// novade-system/src/dbus_interfaces/mod.rs

pub mod hints;
pub mod notifications_server;

pub use hints::{hint_from_value, hints_from_dbus};
pub use notifications_server::{spawn_signal_forwarder, NotificationsServer, NOTIFICATIONS_BUS_NAME, NOTIFICATIONS_PATH};
