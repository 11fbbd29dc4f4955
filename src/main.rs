use anyhow::Result;
use ifwatch::*;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::{RwLock, broadcast};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = version::VERSION,
        backend = %app_config.monitoring.backend,
        "starting ifwatch"
    );

    let tools = Arc::new(tool_repo::ToolRepo::locate(&app_config.tools)?);

    let interfaces = if app_config.monitoring.interfaces.is_empty() {
        let discovered = tools.discover_interfaces().await?;
        tracing::info!(
            interfaces = ?discovered,
            "no interfaces configured; monitored set seeded from discovery"
        );
        discovered
    } else {
        app_config.monitoring.interfaces.clone()
    };

    let table = Arc::new(RwLock::new(state::InterfaceTable::new(&interfaces)));
    let (tx, _) =
        broadcast::channel::<models::NetworkSnapshot>(app_config.publishing.broadcast_capacity);

    let backend = backend::create_backend(
        &app_config.monitoring.backend,
        tools,
        table.clone(),
        app_config.monitoring.link_failure_limit,
    )?;

    let cycles_completed_total = Arc::new(AtomicU64::new(0));
    let cycles_skipped_total = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let poller_handle = poller::spawn(
        poller::PollerDeps {
            backend,
            table,
            tx,
            cycles_completed_total,
            cycles_skipped_total,
            shutdown_rx,
        },
        poller::PollerConfig {
            poll_interval_secs: app_config.monitoring.poll_interval_secs,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = poller_handle.await;

    Ok(())
}
