//! System layer of the NovaDE notification daemon.
//!
//! - [`dbus_interfaces`]: the `org.freedesktop.Notifications` object and hint
//!   conversion from D-Bus variants.
//! - [`dbus_integration`]: bus connection and service registration.
//! - [`desktop_entry`]: icon lookup in installed `.desktop` files.
//! - [`notification_integration`]: hand-off of broker events to a presenter.

pub mod dbus_integration;
pub mod dbus_interfaces;
pub mod desktop_entry;
pub mod notification_integration;

pub use dbus_integration::{DbusManagerError, DbusServiceManager};
pub use dbus_interfaces::NotificationsServer;
pub use desktop_entry::XdgDesktopEntryLookup;
pub use notification_integration::{NotificationPresenter, PresentationBridge, TracingPresenter};
