// Backend coordinator: periodic timer drives one poll cycle at a time.
// A tick that arrives while a cycle is still running is dropped and counted;
// overlapping cycles would interleave writes into the same records.

use crate::backend::Backend;
use crate::models::NetworkSnapshot;
use crate::state::InterfaceTable;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, broadcast};
use tokio::time::{Duration, Instant, interval};

/// Rate limit for the "no receivers" log (avoid one line per second when no
/// observer is attached).
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Backend, shared table, channels, counters, and shutdown for the poller.
pub struct PollerDeps {
    pub backend: Box<dyn Backend + Send>,
    pub table: Arc<RwLock<InterfaceTable>>,
    pub tx: broadcast::Sender<NetworkSnapshot>,
    pub cycles_completed_total: Arc<AtomicU64>,
    pub cycles_skipped_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Poller timing and logging config.
pub struct PollerConfig {
    pub poll_interval_secs: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: PollerDeps, config: PollerConfig) -> tokio::task::JoinHandle<()> {
    let PollerDeps {
        backend,
        table,
        tx,
        cycles_completed_total,
        cycles_skipped_total,
        mut shutdown_rx,
    } = deps;
    let PollerConfig {
        poll_interval_secs,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(poll_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_no_receivers_log: Option<Instant> = None;

        // The backend is handed to the cycle task and returned on completion;
        // an empty slot means a cycle is in flight.
        let mut backend = Some(backend);
        let mut in_flight: Option<
            tokio::task::JoinHandle<(Box<dyn Backend + Send>, NetworkSnapshot)>,
        > = None;

        let poller_span = tracing::span!(tracing::Level::DEBUG, "poller", poll_interval_secs);
        let _guard = poller_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if in_flight.is_some() {
                        cycles_skipped_total.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            operation = "poll_cycle",
                            "previous poll cycle still running; tick dropped"
                        );
                    } else if let Some(mut b) = backend.take() {
                        let table = table.clone();
                        in_flight = Some(tokio::spawn(async move {
                            b.update().await;
                            let snapshot = table.read().await.snapshot(now_ms());
                            (b, snapshot)
                        }));
                    }
                }
                result = async { in_flight.as_mut().unwrap().await }, if in_flight.is_some() => {
                    in_flight = None;
                    match result {
                        Ok((b, snapshot)) => {
                            backend = Some(b);
                            cycles_completed_total.fetch_add(1, Ordering::Relaxed);
                            if tx.send(snapshot).is_err() {
                                let should_log = last_no_receivers_log
                                    .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                                if should_log {
                                    tracing::debug!(
                                        operation = "broadcast_snapshot",
                                        "no observers on broadcast channel"
                                    );
                                    last_no_receivers_log = Some(Instant::now());
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "poll cycle task failed; poller stopping");
                            break;
                        }
                    }
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        cycles_completed_total = cycles_completed_total.load(Ordering::Relaxed),
                        cycles_skipped_total = cycles_skipped_total.load(Ordering::Relaxed),
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    if let Some(handle) = in_flight.take() {
                        // kill_on_drop terminates the child processes; their
                        // partial output is discarded, never applied.
                        handle.abort();
                    }
                    tracing::debug!("Poller shutting down");
                    break;
                }
            }
        }
    })
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
