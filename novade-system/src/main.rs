use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use novade_core::{init_logging, init_minimal_logging, ConfigLoader, NotificationsDaemonConfig};
use novade_domain::notifications::{DefaultNotificationBroker, NotificationBroker};
use novade_system::{DbusServiceManager, PresentationBridge, TracingPresenter, XdgDesktopEntryLookup};

/// Desktop notification server for the NovaDE session.
#[derive(Parser, Debug)]
#[command(name = "novade-notifyd", version, about)]
struct CliArgs {
    /// Read this configuration file instead of the XDG locations.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log level, overriding the configuration (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn load_config(args: &CliArgs) -> anyhow::Result<NotificationsDaemonConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    if let Some(level) = &args.log_level {
        config.logging.level = level.to_lowercase();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_minimal_logging();
            tracing::error!("{:#}", e);
            return Err(e);
        }
    };
    init_logging(&config.logging, false).context("Failed to initialize logging")?;
    tracing::info!("novade-notifyd {} starting", env!("CARGO_PKG_VERSION"));

    let desktop_entries = Arc::new(XdgDesktopEntryLookup::from_env());
    let broker: Arc<dyn NotificationBroker> =
        Arc::new(DefaultNotificationBroker::new(&config.notifications, desktop_entries));

    let bridge = PresentationBridge::new(
        Arc::clone(&broker),
        Arc::new(TracingPresenter::with_expiry(Arc::clone(&broker))),
    )
    .spawn();

    let manager = DbusServiceManager::new_session()
        .await
        .context("Cannot connect to the session bus")?;
    let forwarder = match manager.serve_notifications(Arc::clone(&broker)).await {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to register the notification service: {}", e);
            return Err(e).context("Another notification server may already be running");
        }
    };
    tracing::info!("Notification service ready");

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    tracing::info!("Shutting down");
    forwarder.abort();
    bridge.abort();
    Ok(())
}
