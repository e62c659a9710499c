//! Domain layer of the NovaDE notification daemon.
//!
//! Transport-agnostic: nothing in here knows about D-Bus. The system layer
//! feeds requests into a [`NotificationBroker`] and forwards its events.

pub mod notifications;

pub use notifications::{
    CloseReason, DefaultNotificationBroker, NotificationBroker, NotificationError, NotificationEvent,
    NotificationRequest,
};
