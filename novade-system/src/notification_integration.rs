//! Notification integration module for the NovaDE system layer.
//!
//! Connects the broker's event stream to whatever puts notifications on
//! screen. A presenter implements [`NotificationPresenter`];
//! [`PresentationBridge`] feeds it. The headless daemon uses
//! [`TracingPresenter`], which only logs and expires notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use novade_domain::notifications::{
    CloseReason, ImageBinding, NotificationBroker, NotificationEvent, NotificationId, ReceivedNotification,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Presentation side of the broker.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Shows a notification, or updates it in place if `notification.id` is
    /// already on screen.
    async fn show(&self, notification: &ReceivedNotification, image: Option<Arc<ImageBinding>>);

    /// Removes a notification from the screen.
    async fn withdraw(&self, id: NotificationId, reason: CloseReason);

    async fn action_invoked(&self, _id: NotificationId, _action_id: &str) {}
}

/// Drains the broker's event channel into a presenter.
pub struct PresentationBridge {
    broker: Arc<dyn NotificationBroker>,
    presenter: Arc<dyn NotificationPresenter>,
    events: broadcast::Receiver<NotificationEvent>,
}

impl PresentationBridge {
    /// Subscribes immediately; events published after this call are delivered.
    pub fn new(broker: Arc<dyn NotificationBroker>, presenter: Arc<dyn NotificationPresenter>) -> Self {
        let events = broker.subscribe();
        Self {
            broker,
            presenter,
            events,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until the broker is dropped.
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => self.dispatch(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Presentation bridge lagged; {} notification event(s) skipped", skipped);
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Notification event channel closed; presentation bridge stopping");
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, event: NotificationEvent) {
        match event {
            NotificationEvent::Received(notification) => {
                let image = self.broker.image_for(notification.id).await;
                self.presenter.show(&notification, image).await;
            }
            NotificationEvent::Closed { id, reason } => self.presenter.withdraw(id, reason).await,
            NotificationEvent::ActionInvoked { id, action_id } => self.presenter.action_invoked(id, &action_id).await,
        }
    }
}

/// Logs every notification and, when given a broker, expires timed ones.
#[derive(Default)]
pub struct TracingPresenter {
    expiry: Option<Arc<dyn NotificationBroker>>,
}

impl TracingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `Expired` to `broker` once a non-persistent notification's
    /// timeout has run out.
    pub fn with_expiry(broker: Arc<dyn NotificationBroker>) -> Self {
        Self { expiry: Some(broker) }
    }

    // The broker ignores the expiry if the notification was replaced in the
    // meantime, so a stale timer is harmless.
    fn arm_timer(broker: Arc<dyn NotificationBroker>, notification: &ReceivedNotification) {
        if notification.persistent {
            return;
        }
        let (id, revision) = (notification.id, notification.revision);
        let timeout = Duration::from_millis(u64::from(notification.timeout_ms));
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            broker.expire(id, revision).await;
        });
    }
}

#[async_trait]
impl NotificationPresenter for TracingPresenter {
    async fn show(&self, notification: &ReceivedNotification, image: Option<Arc<ImageBinding>>) {
        tracing::info!(
            "Notification {} from '{}': {} ({} ms{})",
            notification.id,
            notification.app_name,
            notification.summary,
            notification.timeout_ms,
            if notification.persistent { ", persistent" } else { "" }
        );
        match serde_json::to_string(notification) {
            Ok(json) => tracing::debug!("Notification payload: {}", json),
            Err(e) => tracing::warn!("Cannot serialize notification {}: {}", notification.id, e),
        }
        if let Some(binding) = image {
            tracing::debug!(
                "Notification {} visual: bitmap={:?}, icon='{}', desktop icon={:?}",
                notification.id,
                binding.image.as_ref().map(|img| img.dimensions()),
                binding.icon_name,
                binding.desktop_entry_icon_name
            );
        }
        if let Some(broker) = &self.expiry {
            Self::arm_timer(Arc::clone(broker), notification);
        }
    }

    async fn withdraw(&self, id: NotificationId, reason: CloseReason) {
        tracing::info!("Notification {} withdrawn ({:?})", id, reason);
    }

    async fn action_invoked(&self, id: NotificationId, action_id: &str) {
        tracing::info!("Action '{}' invoked on notification {}", action_id, id);
    }
}
