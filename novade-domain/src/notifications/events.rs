use serde::Serialize;

use super::hints::Hints;
use super::types::{CloseReason, NotificationAction, NotificationId};

/// Everything the presentation layer needs to show a notification.
///
/// The bitmap itself is not carried here; fetch it with
/// `NotificationBroker::image_for`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivedNotification {
    pub id: NotificationId,
    /// Bumped every time `id` is published with new content; see
    /// `NotificationBroker::expire`.
    pub revision: u64,
    /// Sender name, or the configured placeholder if the client sent none.
    pub app_name: String,
    pub app_icon: String,
    pub has_icon: bool,
    pub summary: String,
    pub body: String,
    pub actions: Vec<NotificationAction>,
    pub persistent: bool,
    pub timeout_ms: u32,
    pub hints: Hints,
}

/// Events published by the broker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NotificationEvent {
    Received(ReceivedNotification),
    Closed { id: NotificationId, reason: CloseReason },
    ActionInvoked { id: NotificationId, action_id: String },
}

impl NotificationEvent {
    pub fn id(&self) -> NotificationId {
        match self {
            NotificationEvent::Received(n) => n.id,
            NotificationEvent::Closed { id, .. } | NotificationEvent::ActionInvoked { id, .. } => *id,
        }
    }
}
