use serde::{Deserialize, Serialize};

use super::hints::Hints;

/// Identifier handed back to clients by `Notify`. Zero is never issued.
pub type NotificationId = u32;

/// Key used to coalesce notifications carrying the same content: the sender's
/// application name immediately followed by the summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SenderKey(String);

impl SenderKey {
    pub fn new(app_name: &str, summary: &str) -> Self {
        let mut key = String::with_capacity(app_name.len() + summary.len());
        key.push_str(app_name);
        key.push_str(summary);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One button offered by a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: String,
    pub label: String,
}

impl NotificationAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Builds the action list from the flat `[id, label, id, label, ...]` wire
/// layout. A trailing id without a label is dropped.
pub fn actions_from_pairs<S: AsRef<str>>(flat: &[S]) -> Vec<NotificationAction> {
    flat.chunks_exact(2)
        .map(|pair| NotificationAction::new(pair[0].as_ref(), pair[1].as_ref()))
        .collect()
}

/// Why a notification went away, with the numeric codes of the
/// `NotificationClosed` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloseReason {
    Expired,
    DismissedByUser,
    ClosedByApplication,
    Undefined,
}

impl CloseReason {
    pub const fn code(self) -> u32 {
        match self {
            CloseReason::Expired => 1,
            CloseReason::DismissedByUser => 2,
            CloseReason::ClosedByApplication => 3,
            CloseReason::Undefined => 4,
        }
    }

    /// Maps a wire code back to a reason; unknown codes become `Undefined`.
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => CloseReason::Expired,
            2 => CloseReason::DismissedByUser,
            3 => CloseReason::ClosedByApplication,
            _ => CloseReason::Undefined,
        }
    }
}

/// A `Notify` call as received from a client, independent of transport.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationRequest {
    pub app_name: String,
    /// Zero means no replacement was requested.
    pub replaces_id: NotificationId,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    /// Flat `[id, label, ...]` list as sent on the wire.
    pub actions: Vec<String>,
    pub hints: Hints,
    /// Requested expiry in milliseconds; `0` asks for a persistent notification.
    pub expire_timeout: i32,
}

/// Answer to `GetServerInformation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInformation {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub spec_version: String,
}

/// Capabilities advertised by `GetCapabilities`, in wire order.
pub const CAPABILITIES: [&str; 6] = [
    "body",
    "body-hyperlinks",
    "body-markup",
    "icon-static",
    "actions",
    "persistence",
];

pub const SERVER_NAME: &str = "NovaDE";
pub const SERVER_VENDOR: &str = "NovaDE";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SPEC_VERSION: &str = "1.1";
