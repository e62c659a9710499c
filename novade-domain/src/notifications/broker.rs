use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info};

use novade_core::config::NotificationsConfig;

use super::events::{NotificationEvent, ReceivedNotification};
use super::identity::IdAllocator;
use super::image::{DesktopEntryLookup, ImageBinding, ImageResolver};
use super::live_index::LiveNotificationIndex;
use super::replacement::ReplacementEngine;
use super::timeout::{estimate, text_length};
use super::types::{
    actions_from_pairs, CloseReason, NotificationId, NotificationRequest, SenderKey, ServerInformation, CAPABILITIES,
    SERVER_NAME, SERVER_VENDOR, SERVER_VERSION, SPEC_VERSION,
};

#[async_trait]
pub trait NotificationBroker: Send + Sync {
    /// Accepts a client notification and returns the id it is shown under.
    async fn notify(&self, request: NotificationRequest) -> NotificationId;

    /// Closes a notification on behalf of its client. Unknown ids are ignored.
    /// Returns whether the id was live.
    async fn close(&self, id: NotificationId) -> bool;

    /// The presentation layer closed a notification (expired, dismissed, ...).
    /// Same teardown as [`Self::close`], reporting the presentation's reason.
    async fn presentation_closed(&self, id: NotificationId, reason: CloseReason) -> bool;

    /// Closes `id` as `Expired` if it still shows the content published with
    /// `revision`. A notification replaced since then stays open.
    async fn expire(&self, id: NotificationId, revision: u64) -> bool;

    /// The user triggered an action; forwarded verbatim.
    async fn invoke_action(&self, id: NotificationId, action_id: &str);

    /// The image binding of a live notification.
    async fn image_for(&self, id: NotificationId) -> Option<Arc<ImageBinding>>;

    async fn is_live(&self, id: NotificationId) -> bool;

    async fn live_count(&self) -> usize;

    fn capabilities(&self) -> Vec<String>;

    fn server_information(&self) -> ServerInformation;

    /// All events, on a bounded channel; slow receivers may miss some.
    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent>;

    /// Close and action events only. Nothing is dropped, however far the
    /// receiver falls behind.
    async fn subscribe_lifecycle(&self) -> mpsc::UnboundedReceiver<NotificationEvent>;
}

/// Everything mutated per request, kept behind a single lock so that two
/// concurrent requests for the same sender cannot both believe they came first.
#[derive(Debug)]
struct BrokerState {
    live: LiveNotificationIndex,
    replacement: ReplacementEngine,
    images: HashMap<NotificationId, Arc<ImageBinding>>,
    /// Revision of the content each live id currently shows.
    revisions: HashMap<NotificationId, u64>,
    last_revision: u64,
    lifecycle_subscribers: Vec<mpsc::UnboundedSender<NotificationEvent>>,
}

impl BrokerState {
    /// Drops the live entry and its image. Returns whether anything was live.
    fn tear_down(&mut self, id: NotificationId) -> bool {
        if self.live.remove(id).is_none() {
            return false;
        }
        self.revisions.remove(&id);
        if self.images.remove(&id).is_some() {
            debug!("Released image binding of notification {}", id);
        }
        true
    }

    fn publish_lifecycle(&mut self, event: &NotificationEvent) {
        self.lifecycle_subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

pub struct DefaultNotificationBroker {
    state: Mutex<BrokerState>,
    ids: IdAllocator,
    image_resolver: ImageResolver,
    unknown_application_name: String,
    event_publisher: broadcast::Sender<NotificationEvent>,
}

impl DefaultNotificationBroker {
    pub fn new(config: &NotificationsConfig, desktop_entries: Arc<dyn DesktopEntryLookup>) -> Self {
        let (event_publisher, _) = broadcast::channel(config.event_buffer.max(1));
        info!(
            "Notification broker created; throttled senders: {:?}",
            config.throttled_applications
        );
        Self {
            state: Mutex::new(BrokerState {
                live: LiveNotificationIndex::new(),
                replacement: ReplacementEngine::new(config.throttled_applications.iter().cloned()),
                images: HashMap::new(),
                revisions: HashMap::new(),
                last_revision: 0,
                lifecycle_subscribers: Vec::new(),
            }),
            ids: IdAllocator::new(),
            image_resolver: ImageResolver::new(desktop_entries),
            unknown_application_name: config.unknown_application_name.clone(),
            event_publisher,
        }
    }

    fn publish_event(&self, event: NotificationEvent) {
        if self.event_publisher.send(event).is_err() {
            debug!("No subscriber for notification events; event dropped");
        }
    }

    fn close_locked(&self, state: &mut BrokerState, id: NotificationId, reason: CloseReason) -> bool {
        if !state.tear_down(id) {
            debug!("Close for notification {} ignored: not live", id);
            return false;
        }
        debug!("Notification {} closed ({:?})", id, reason);
        let event = NotificationEvent::Closed { id, reason };
        state.publish_lifecycle(&event);
        self.publish_event(event);
        true
    }
}

#[async_trait]
impl NotificationBroker for DefaultNotificationBroker {
    async fn notify(&self, request: NotificationRequest) -> NotificationId {
        let NotificationRequest {
            app_name,
            replaces_id,
            app_icon,
            summary,
            body,
            actions,
            hints,
            expire_timeout,
        } = request;

        // Image and duration depend only on the request, so they are computed
        // before taking the lock; file reads then never block other callers.
        let binding = Arc::new(self.image_resolver.resolve(&hints, &app_icon));
        let has_icon = binding.has_visual();
        let duration = estimate(text_length(&summary), text_length(&body), expire_timeout);
        let actions = actions_from_pairs(&actions);

        let mut state = self.state.lock().await;
        let BrokerState {
            live,
            replacement,
            images,
            revisions,
            last_revision,
            ..
        } = &mut *state;

        let resolution = replacement.resolve_id(&app_name, &summary, replaces_id, live, &self.ids);
        let id = resolution.id;
        debug!(
            "Notification {} from '{}' ({:?}, requested replace {}): {:?} / {:?}",
            id, app_name, resolution.source, replaces_id, summary, body
        );

        if images.insert(id, binding).is_some() {
            debug!("Replaced image binding of notification {}", id);
        }
        live.insert(id, SenderKey::new(&app_name, &summary));
        *last_revision += 1;
        let revision = *last_revision;
        revisions.insert(id, revision);

        let app_name = if app_name.is_empty() {
            self.unknown_application_name.clone()
        } else {
            app_name
        };

        self.publish_event(NotificationEvent::Received(ReceivedNotification {
            id,
            revision,
            app_name,
            app_icon,
            has_icon,
            summary,
            body,
            actions,
            persistent: duration.persistent,
            timeout_ms: duration.timeout_ms,
            hints,
        }));
        id
    }

    async fn close(&self, id: NotificationId) -> bool {
        let mut state = self.state.lock().await;
        self.close_locked(&mut state, id, CloseReason::ClosedByApplication)
    }

    async fn presentation_closed(&self, id: NotificationId, reason: CloseReason) -> bool {
        let mut state = self.state.lock().await;
        self.close_locked(&mut state, id, reason)
    }

    async fn expire(&self, id: NotificationId, revision: u64) -> bool {
        let mut state = self.state.lock().await;
        if state.revisions.get(&id) != Some(&revision) {
            debug!("Expiry of notification {} at revision {} ignored: replaced or closed", id, revision);
            return false;
        }
        self.close_locked(&mut state, id, CloseReason::Expired)
    }

    async fn invoke_action(&self, id: NotificationId, action_id: &str) {
        debug!("Action '{}' invoked on notification {}", action_id, id);
        let event = NotificationEvent::ActionInvoked {
            id,
            action_id: action_id.to_string(),
        };
        self.state.lock().await.publish_lifecycle(&event);
        self.publish_event(event);
    }

    async fn image_for(&self, id: NotificationId) -> Option<Arc<ImageBinding>> {
        self.state.lock().await.images.get(&id).cloned()
    }

    async fn is_live(&self, id: NotificationId) -> bool {
        self.state.lock().await.live.contains(id)
    }

    async fn live_count(&self) -> usize {
        self.state.lock().await.live.len()
    }

    fn capabilities(&self) -> Vec<String> {
        CAPABILITIES.iter().map(|c| c.to_string()).collect()
    }

    fn server_information(&self) -> ServerInformation {
        ServerInformation {
            name: SERVER_NAME.to_string(),
            vendor: SERVER_VENDOR.to_string(),
            version: SERVER_VERSION.to_string(),
            spec_version: SPEC_VERSION.to_string(),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.event_publisher.subscribe()
    }

    async fn subscribe_lifecycle(&self) -> mpsc::UnboundedReceiver<NotificationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().await.lifecycle_subscribers.push(tx);
        rx
    }
}
