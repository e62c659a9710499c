// novade-domain/tests/notification_broker_tests.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use novade_core::config::NotificationsConfig;
use novade_domain::notifications::{
    CloseReason, DefaultNotificationBroker, DesktopEntryLookup, HintValue, NotificationBroker, NotificationEvent,
    NotificationRequest, RawImageData, ReceivedNotification,
};
use pretty_assertions::assert_eq;
use tokio::sync::broadcast::error::TryRecvError;

struct StaticEntries(HashMap<String, String>);

impl DesktopEntryLookup for StaticEntries {
    fn icon_name(&self, desktop_entry: &str) -> Option<String> {
        self.0.get(desktop_entry).cloned()
    }
}

fn broker(throttled: &[&str]) -> DefaultNotificationBroker {
    let config = NotificationsConfig {
        throttled_applications: throttled.iter().map(|s| s.to_string()).collect(),
        event_buffer: 256,
        ..NotificationsConfig::default()
    };
    let entries = StaticEntries(
        [("org.mozilla.firefox".to_string(), "firefox".to_string())]
            .into_iter()
            .collect(),
    );
    DefaultNotificationBroker::new(&config, Arc::new(entries))
}

fn request(app: &str, summary: &str, replaces_id: u32) -> NotificationRequest {
    NotificationRequest {
        app_name: app.to_string(),
        replaces_id,
        summary: summary.to_string(),
        expire_timeout: -1,
        ..NotificationRequest::default()
    }
}

fn rgba_pixel() -> HintValue {
    HintValue::Image(RawImageData {
        width: 1,
        height: 1,
        rowstride: 4,
        has_alpha: true,
        bits_per_sample: 8,
        channels: 4,
        data: vec![0, 0, 0, 255],
    })
}

fn next_received(rx: &mut tokio::sync::broadcast::Receiver<NotificationEvent>) -> ReceivedNotification {
    match rx.try_recv() {
        Ok(NotificationEvent::Received(n)) => n,
        other => panic!("expected a Received event, got {:?}", other),
    }
}

#[tokio::test]
async fn first_notifications_get_sequential_ids() {
    let broker = broker(&[]);
    assert_eq!(broker.notify(request("Mail", "one", 0)).await, 1);
    assert_eq!(broker.notify(request("Mail", "two", 0)).await, 2);
    assert_eq!(broker.notify(request("Chat", "three", 0)).await, 3);
    assert_eq!(broker.live_count().await, 3);
}

#[tokio::test]
async fn identical_content_is_coalesced() {
    let broker = broker(&[]);
    let first = broker.notify(request("Build", "Compilation finished", 0)).await;
    let second = broker.notify(request("Build", "Compilation finished", 0)).await;
    assert_eq!(first, second);
    assert_eq!(broker.live_count().await, 1);

    // An explicit replaces_id does not break the match.
    let other = broker.notify(request("Build", "Tests running", 0)).await;
    assert_eq!(broker.notify(request("Build", "Compilation finished", other)).await, first);
}

#[tokio::test]
async fn throttled_sender_reuses_its_id_for_new_content() {
    let broker = broker(&["Spotify"]);
    let mut rx = broker.subscribe();

    let first = broker.notify(request("Spotify", "Song A", 0)).await;
    let second = broker.notify(request("Spotify", "Song B", 0)).await;
    assert_eq!(first, second);

    assert_eq!(next_received(&mut rx).summary, "Song A");
    let replaced = next_received(&mut rx);
    assert_eq!(replaced.id, first);
    assert_eq!(replaced.summary, "Song B");
}

#[tokio::test]
async fn throttled_id_survives_close() {
    let broker = broker(&["Spotify"]);
    let id = broker.notify(request("Spotify", "Song A", 0)).await;
    assert!(broker.close(id).await);
    assert!(!broker.is_live(id).await);
    assert_eq!(broker.notify(request("Spotify", "Song C", 0)).await, id);
    assert!(broker.is_live(id).await);
}

#[tokio::test]
async fn closed_id_can_be_explicitly_replaced_by_another_sender() {
    let broker = broker(&[]);
    let mut first = request("Viewer", "Photo", 0);
    first.hints.insert("image_data", rgba_pixel());
    let id = broker.notify(first).await;
    assert!(broker.close(id).await);
    assert!(broker.image_for(id).await.is_none());

    let second = request("Mail", "Inbox", id);
    assert_eq!(broker.notify(second).await, id);
    let binding = broker.image_for(id).await.expect("fresh binding for replaced id");
    assert!(binding.image.is_none());
}

#[tokio::test]
async fn desktop_entry_icon_is_resolved() {
    let broker = broker(&[]);
    let mut rx = broker.subscribe();
    let mut req = request("Firefox", "Download complete", 0);
    req.hints.insert("desktop-entry", HintValue::Text("org.mozilla.firefox".into()));
    let id = broker.notify(req).await;

    assert!(next_received(&mut rx).has_icon);
    let binding = broker.image_for(id).await.unwrap();
    assert_eq!(binding.desktop_entry_icon_name.as_deref(), Some("firefox"));
}

#[tokio::test]
async fn inline_image_wins_over_path() {
    let broker = broker(&[]);
    let mut req = request("Viewer", "Photo", 0);
    req.hints.insert("image-path", HintValue::Text("/does/not/exist.png".into()));
    req.hints.insert("image-data", rgba_pixel());
    let id = broker.notify(req).await;
    let binding = broker.image_for(id).await.unwrap();
    assert_eq!(binding.image.as_ref().map(|i| i.dimensions()), Some((1, 1)));
}

#[tokio::test]
async fn persistent_and_timed_durations() {
    let broker = broker(&[]);
    let mut rx = broker.subscribe();

    let mut persistent = request("Calendar", "Meeting", 0);
    persistent.expire_timeout = 0;
    broker.notify(persistent).await;
    let received = next_received(&mut rx);
    assert!(received.persistent);
    assert_eq!(received.timeout_ms, 5000);

    let mut long = request("Mail", &"s".repeat(600), 0);
    long.body = "b".repeat(600);
    long.expire_timeout = 5;
    broker.notify(long).await;
    let received = next_received(&mut rx);
    assert!(!received.persistent);
    assert_eq!(received.timeout_ms, 50000);
}

#[tokio::test]
async fn close_reports_reason_once() {
    let broker = broker(&[]);
    let id = broker.notify(request("Mail", "x", 0)).await;
    let mut rx = broker.subscribe();

    assert!(broker.presentation_closed(id, CloseReason::DismissedByUser).await);
    assert!(!broker.close(id).await);
    assert_eq!(
        rx.try_recv().unwrap(),
        NotificationEvent::Closed {
            id,
            reason: CloseReason::DismissedByUser
        }
    );
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_requests_get_distinct_ids() {
    let broker = Arc::new(broker(&[]));
    let mut handles = Vec::new();
    for task in 0..8 {
        let broker = Arc::clone(&broker);
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for n in 0..50 {
                ids.push(broker.notify(request("Load", &format!("{}-{}", task, n), 0)).await);
            }
            ids
        }));
    }
    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(all.insert(id), "id {} issued twice", id);
        }
    }
    assert_eq!(all.len(), 400);
    assert!(!all.contains(&0));
    assert_eq!(broker.live_count().await, 400);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_requests_share_one_id() {
    let broker = Arc::new(broker(&[]));
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let broker = Arc::clone(&broker);
            tokio::spawn(async move { broker.notify(request("Backup", "Done", 0)).await })
        })
        .collect();
    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 1);
    assert_eq!(broker.live_count().await, 1);
}
