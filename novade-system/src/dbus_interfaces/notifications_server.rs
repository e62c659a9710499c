// novade-system/src/dbus_interfaces/notifications_server.rs

//! `org.freedesktop.Notifications` on the session bus, backed by a
//! [`NotificationBroker`].

use std::collections::HashMap;
use std::sync::Arc;

use novade_domain::notifications::{NotificationBroker, NotificationEvent, NotificationRequest};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use zbus::zvariant::Value;
use zbus::{dbus_interface, Connection, SignalContext};

use super::hints::hints_from_dbus;

pub const NOTIFICATIONS_BUS_NAME: &str = "org.freedesktop.Notifications";
pub const NOTIFICATIONS_PATH: &str = "/org/freedesktop/Notifications";

pub struct NotificationsServer {
    broker: Arc<dyn NotificationBroker>,
}

impl NotificationsServer {
    pub fn new(broker: Arc<dyn NotificationBroker>) -> Self {
        Self { broker }
    }
}

#[dbus_interface(name = "org.freedesktop.Notifications")]
impl NotificationsServer {
    async fn get_capabilities(&self) -> Vec<String> {
        tracing::debug!("D-Bus GetCapabilities called");
        self.broker.capabilities()
    }

    #[allow(clippy::too_many_arguments)]
    async fn notify(
        &self,
        app_name: String,
        replaces_id: u32,
        app_icon: String,
        summary: String,
        body: String,
        actions: Vec<String>,
        hints: HashMap<String, Value<'_>>,
        expire_timeout: i32,
    ) -> u32 {
        tracing::debug!(
            "D-Bus Notify called: app_name='{}', replaces_id={}, {} hint(s)",
            app_name,
            replaces_id,
            hints.len()
        );
        let request = NotificationRequest {
            app_name,
            replaces_id,
            app_icon,
            summary,
            body,
            actions,
            hints: hints_from_dbus(&hints),
            expire_timeout,
        };
        self.broker.notify(request).await
    }

    async fn close_notification(&self, id: u32) {
        tracing::debug!("D-Bus CloseNotification called for id {}", id);
        // Unknown ids are silently ignored; the protocol has no error for them.
        self.broker.close(id).await;
    }

    async fn get_server_information(&self) -> (String, String, String, String) {
        let info = self.broker.server_information();
        (info.name, info.vendor, info.version, info.spec_version)
    }

    #[dbus_interface(signal)]
    pub async fn notification_closed(ctxt: &SignalContext<'_>, id: u32, reason: u32) -> zbus::Result<()>;

    #[dbus_interface(signal)]
    pub async fn action_invoked(ctxt: &SignalContext<'_>, id: u32, action_key: &str) -> zbus::Result<()>;
}

/// Relays close and action events as signals.
///
/// `events` comes from `NotificationBroker::subscribe_lifecycle` and should be
/// taken before the server starts accepting calls so that no close is missed.
/// The task ends when the broker is dropped.
pub fn spawn_signal_forwarder(
    connection: Connection,
    mut events: mpsc::UnboundedReceiver<NotificationEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ctxt = match SignalContext::new(&connection, NOTIFICATIONS_PATH) {
            Ok(ctxt) => ctxt,
            Err(e) => {
                tracing::error!("Cannot create signal context for {}: {}", NOTIFICATIONS_PATH, e);
                return;
            }
        };
        while let Some(event) = events.recv().await {
            let result = match event {
                NotificationEvent::Closed { id, reason } => {
                    NotificationsServer::notification_closed(&ctxt, id, reason.code()).await
                }
                NotificationEvent::ActionInvoked { id, action_id } => {
                    NotificationsServer::action_invoked(&ctxt, id, &action_id).await
                }
                NotificationEvent::Received(_) => continue,
            };
            if let Err(e) = result {
                tracing::error!("Failed to emit notification signal: {}", e);
            }
        }
        tracing::debug!("Notification lifecycle channel closed; signal forwarder stopping");
    })
}
