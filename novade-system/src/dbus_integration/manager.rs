// novade-system/src/dbus_integration/manager.rs

use std::sync::Arc;

use novade_domain::notifications::NotificationBroker;
use thiserror::Error;
use tokio::task::JoinHandle;
use zbus::names::WellKnownName;
use zbus::{Connection, Error as ZbusError};

use crate::dbus_interfaces::notifications_server::{
    spawn_signal_forwarder, NotificationsServer, NOTIFICATIONS_BUS_NAME, NOTIFICATIONS_PATH,
};

#[derive(Debug, Error)]
pub enum DbusManagerError {
    #[error("D-Bus connection failed: {0}")]
    ConnectionFailed(#[from] ZbusError),
    #[error("Failed to request D-Bus service name '{name}': {source}")]
    NameRequestFailed { name: String, source: ZbusError },
    #[error("Failed to serve D-Bus object at path '{path}': {source}")]
    ServeAtFailed { path: String, source: ZbusError },
    #[error("D-Bus object path '{path}' already serves this interface")]
    PathAlreadyTaken { path: String },
}

pub type Result<T> = std::result::Result<T, DbusManagerError>;

/// Owns the bus connection and registers the notification service on it.
#[derive(Clone)]
pub struct DbusServiceManager {
    connection: Connection,
}

impl DbusServiceManager {
    /// Connects to the session bus, where notification servers live.
    pub async fn new_session() -> Result<Self> {
        tracing::info!("Connecting to D-Bus session bus...");
        let connection = Connection::session().await?;
        tracing::info!(
            "Connected to D-Bus session bus. Unique name: {}",
            connection
                .unique_name()
                .map_or_else(|| "<unknown>".to_string(), |n| n.to_string())
        );
        Ok(Self { connection })
    }

    /// Wraps an existing connection, e.g. one to a private test bus.
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> Connection {
        self.connection.clone()
    }

    pub async fn request_name(&self, name: &str) -> Result<()> {
        let well_known_name = WellKnownName::try_from(name).map_err(|e| DbusManagerError::NameRequestFailed {
            name: name.to_string(),
            source: ZbusError::from(e),
        })?;

        tracing::info!("Requesting D-Bus name: {}", name);
        self.connection
            .request_name(well_known_name)
            .await
            .map_err(|e| DbusManagerError::NameRequestFailed {
                name: name.to_string(),
                source: e,
            })?;
        tracing::info!("Successfully requested D-Bus name: {}", name);
        Ok(())
    }

    /// Serves `org.freedesktop.Notifications` for `broker`, then claims the
    /// well-known name. Either step failing is an error; the caller is expected
    /// to give up in that case.
    ///
    /// Returns the handle of the task relaying close and action events as
    /// bus signals.
    pub async fn serve_notifications(&self, broker: Arc<dyn NotificationBroker>) -> Result<JoinHandle<()>> {
        // Subscribe before the object is reachable so no event goes unsignalled.
        let events = broker.subscribe_lifecycle().await;

        let registered = self
            .connection
            .object_server()
            .at(NOTIFICATIONS_PATH, NotificationsServer::new(broker))
            .await
            .map_err(|e| DbusManagerError::ServeAtFailed {
                path: NOTIFICATIONS_PATH.to_string(),
                source: e,
            })?;
        if !registered {
            return Err(DbusManagerError::PathAlreadyTaken {
                path: NOTIFICATIONS_PATH.to_string(),
            });
        }
        tracing::info!("Notifications server registered at {}", NOTIFICATIONS_PATH);

        self.request_name(NOTIFICATIONS_BUS_NAME).await?;

        Ok(spawn_signal_forwarder(self.connection.clone(), events))
    }
}
