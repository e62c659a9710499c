// novade-system/tests/notifications_dbus_tests.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::StreamExt;
use novade_core::config::NotificationsConfig;
use novade_domain::notifications::{
    DefaultNotificationBroker, HintValue, NoDesktopEntries, NotificationBroker, NotificationEvent,
};
use novade_system::dbus_interfaces::{spawn_signal_forwarder, NotificationsServer, NOTIFICATIONS_PATH};
use novade_system::{DbusManagerError, DbusServiceManager};
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing_subscriber::{fmt, EnvFilter};
use zbus::zvariant::Value;
use zbus::{Connection, ConnectionBuilder, Guid, MessageStream, MessageType};

const IFACE: &str = "org.freedesktop.Notifications";

fn init_tracing() {
    let _ = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("novade_system=debug".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

struct Peers {
    client: Connection,
    server: Connection,
    broker: Arc<DefaultNotificationBroker>,
}

/// A server and a client joined by a socket pair, with the notifications
/// object served on the server side.
async fn setup() -> Result<Peers> {
    init_tracing();
    let (client_end, server_end) = UnixStream::pair()?;
    let guid = Guid::generate();
    let (client, server) = tokio::try_join!(
        ConnectionBuilder::unix_stream(client_end).p2p().build(),
        ConnectionBuilder::unix_stream(server_end).server(&guid).p2p().build(),
    )?;

    let broker = Arc::new(DefaultNotificationBroker::new(
        &NotificationsConfig::default(),
        Arc::new(NoDesktopEntries),
    ));
    let events = broker.subscribe_lifecycle().await;
    let served = server
        .object_server()
        .at(NOTIFICATIONS_PATH, NotificationsServer::new(broker.clone()))
        .await?;
    assert!(served);
    spawn_signal_forwarder(server.clone(), events);

    Ok(Peers { client, server, broker })
}

async fn notify(client: &Connection, app: &str, replaces_id: u32, summary: &str, hints: HashMap<&str, Value<'_>>) -> Result<u32> {
    let actions: Vec<&str> = vec!["default", "Open"];
    let reply = client
        .call_method(
            None::<&str>,
            NOTIFICATIONS_PATH,
            Some(IFACE),
            "Notify",
            &(app, replaces_id, "mail-unread", summary, "body", actions, hints, -1i32),
        )
        .await?;
    Ok(reply.body::<u32>()?)
}

async fn next_signal(stream: &mut MessageStream, member: &str) -> Result<Arc<zbus::Message>> {
    let wait = async {
        while let Some(msg) = stream.next().await {
            let msg = msg?;
            if msg.message_type() == MessageType::Signal && msg.member().map_or(false, |m| m.as_str() == member) {
                return Ok(msg);
            }
        }
        anyhow::bail!("message stream ended before {} arrived", member)
    };
    timeout(Duration::from_secs(5), wait).await?
}

#[tokio::test(flavor = "multi_thread")]
async fn server_information_and_capabilities() -> Result<()> {
    let peers = setup().await?;

    let reply = peers
        .client
        .call_method(None::<&str>, NOTIFICATIONS_PATH, Some(IFACE), "GetServerInformation", &())
        .await?;
    let (name, vendor, version, spec_version): (String, String, String, String) = reply.body()?;
    assert_eq!((name.as_str(), vendor.as_str(), spec_version.as_str()), ("NovaDE", "NovaDE", "1.1"));
    assert!(!version.is_empty());

    let reply = peers
        .client
        .call_method(None::<&str>, NOTIFICATIONS_PATH, Some(IFACE), "GetCapabilities", &())
        .await?;
    let caps: Vec<String> = reply.body()?;
    assert_eq!(
        caps,
        vec!["body", "body-hyperlinks", "body-markup", "icon-static", "actions", "persistence"]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn notify_coalesces_and_close_emits_signal() -> Result<()> {
    let peers = setup().await?;
    let mut signals = MessageStream::from(&peers.client);

    let first = notify(&peers.client, "Mail", 0, "New message", HashMap::new()).await?;
    let again = notify(&peers.client, "Mail", 0, "New message", HashMap::new()).await?;
    let other = notify(&peers.client, "Mail", 0, "Another", HashMap::new()).await?;
    assert_eq!(first, 1);
    assert_eq!(again, first);
    assert_eq!(other, 2);

    peers
        .client
        .call_method(None::<&str>, NOTIFICATIONS_PATH, Some(IFACE), "CloseNotification", &(first,))
        .await?;
    let closed = next_signal(&mut signals, "NotificationClosed").await?;
    assert_eq!(closed.body::<(u32, u32)>()?, (first, 3));
    assert!(!peers.broker.is_live(first).await);

    // Closing an unknown id is not an error.
    peers
        .client
        .call_method(None::<&str>, NOTIFICATIONS_PATH, Some(IFACE), "CloseNotification", &(999u32,))
        .await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn image_hint_reaches_the_broker() -> Result<()> {
    let peers = setup().await?;
    let mut hints = HashMap::new();
    hints.insert(
        "image-data",
        Value::from((1i32, 1i32, 3i32, false, 8i32, 3i32, vec![10u8, 20, 30])),
    );
    hints.insert("urgency", Value::from(2u8));

    let id = notify(&peers.client, "Viewer", 0, "Photo", hints).await?;
    let binding = peers.broker.image_for(id).await.expect("binding for live notification");
    let image = binding.image.as_ref().expect("decoded image");
    assert_eq!(image.dimensions(), (1, 1));
    assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn container_hints_reach_the_presenter_intact() -> Result<()> {
    let peers = setup().await?;
    let mut events = peers.broker.subscribe();
    let mut hints = HashMap::new();
    hints.insert("x-nova-tags", Value::from(vec!["work", "urgent"]));

    notify(&peers.client, "Mail", 0, "Tagged", hints).await?;
    let received = match timeout(Duration::from_secs(5), events.recv()).await?? {
        NotificationEvent::Received(n) => n,
        other => panic!("expected a Received event, got {:?}", other),
    };
    assert_eq!(
        received.hints.get("x-nova-tags"),
        Some(&HintValue::List(vec![
            HintValue::Text("work".to_string()),
            HintValue::Text("urgent".to_string()),
        ]))
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn close_signal_survives_a_notify_burst() -> Result<()> {
    let peers = setup().await?;
    let mut signals = MessageStream::from(&peers.client);

    let first = notify(&peers.client, "Mail", 0, "first", HashMap::new()).await?;
    peers
        .client
        .call_method(None::<&str>, NOTIFICATIONS_PATH, Some(IFACE), "CloseNotification", &(first,))
        .await?;
    // Far more than the event buffer holds.
    for n in 0..150 {
        notify(&peers.client, "Mail", 0, &format!("burst {}", n), HashMap::new()).await?;
    }

    let closed = next_signal(&mut signals, "NotificationClosed").await?;
    assert_eq!(closed.body::<(u32, u32)>()?, (first, 3));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn presentation_events_become_signals() -> Result<()> {
    let peers = setup().await?;
    let mut signals = MessageStream::from(&peers.client);

    let id = notify(&peers.client, "Chat", 0, "Ping", HashMap::new()).await?;
    peers.broker.invoke_action(id, "default").await;
    let invoked = next_signal(&mut signals, "ActionInvoked").await?;
    assert_eq!(invoked.body::<(u32, String)>()?, (id, "default".to_string()));

    peers
        .broker
        .presentation_closed(id, novade_domain::notifications::CloseReason::DismissedByUser)
        .await;
    let closed = next_signal(&mut signals, "NotificationClosed").await?;
    assert_eq!(closed.body::<(u32, u32)>()?, (id, 2));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn second_registration_on_same_path_fails() -> Result<()> {
    let peers = setup().await?;
    let manager = DbusServiceManager::from_connection(peers.server.clone());
    let broker: Arc<dyn NotificationBroker> = peers.broker.clone();
    match manager.serve_notifications(broker).await {
        Err(DbusManagerError::PathAlreadyTaken { path }) => assert_eq!(path, NOTIFICATIONS_PATH),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("registration on an occupied path succeeded"),
    }
    Ok(())
}
