// Backend abstraction: one `update` per poll cycle, side effects on the
// shared interface table. Concrete backends register themselves in BACKENDS
// and are selected by name from config.

use crate::parse;
use crate::state::InterfaceTable;
use crate::tool_repo::{SourceKind, ToolRepo};
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::RwLock;

pub trait Backend: Send {
    /// Runs one poll cycle: capture every enabled source, apply each
    /// completed capture's parsed facts to the shared table.
    fn update(&mut self) -> BoxFuture<'_, ()>;
}

impl std::fmt::Debug for dyn Backend + Send {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Backend")
    }
}

/// Registry entry: a name/description pair plus a constructor.
pub struct BackendHandle {
    pub name: &'static str,
    pub description: &'static str,
    pub create: fn(Arc<ToolRepo>, Arc<RwLock<InterfaceTable>>, u32) -> Box<dyn Backend + Send>,
}

pub static BACKENDS: &[BackendHandle] = &[BackendHandle {
    name: "nettools",
    description: "captures ifconfig/iwconfig/route output",
    create: NetToolsBackend::create,
}];

/// Looks up a backend by registry name and constructs it.
pub fn create_backend(
    name: &str,
    tools: Arc<ToolRepo>,
    table: Arc<RwLock<InterfaceTable>>,
    link_failure_limit: u32,
) -> anyhow::Result<Box<dyn Backend + Send>> {
    let handle = BACKENDS.iter().find(|b| b.name == name).ok_or_else(|| {
        let known: Vec<&str> = BACKENDS.iter().map(|b| b.name).collect();
        anyhow::anyhow!("unknown backend {name:?}; registered backends: {known:?}")
    })?;
    Ok((handle.create)(tools, table, link_failure_limit))
}

/// Backend over the classic net-tools utilities.
pub struct NetToolsBackend {
    tools: Arc<ToolRepo>,
    table: Arc<RwLock<InterfaceTable>>,
    link_failure_streak: u32,
    link_failure_limit: u32,
}

impl NetToolsBackend {
    pub fn new(
        tools: Arc<ToolRepo>,
        table: Arc<RwLock<InterfaceTable>>,
        link_failure_limit: u32,
    ) -> Self {
        Self {
            tools,
            table,
            link_failure_streak: 0,
            link_failure_limit,
        }
    }

    fn create(
        tools: Arc<ToolRepo>,
        table: Arc<RwLock<InterfaceTable>>,
        link_failure_limit: u32,
    ) -> Box<dyn Backend + Send> {
        Box::new(Self::new(tools, table, link_failure_limit))
    }
}

impl Backend for NetToolsBackend {
    fn update(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            // Captures run concurrently; facts are applied only after a
            // capture has fully completed, and each source owns disjoint
            // fields, so cross-source ordering does not matter.
            let (link, wireless, route) = tokio::join!(
                self.tools.capture(SourceKind::Link),
                self.tools.capture(SourceKind::Wireless),
                self.tools.capture(SourceKind::Route),
            );

            match link {
                Ok(Some(text)) => {
                    let facts = parse::parse_link_info(&text);
                    self.table.write().await.apply_link(&facts);
                    self.link_failure_streak = 0;
                }
                Ok(None) => {}
                Err(e) => {
                    self.link_failure_streak = self.link_failure_streak.saturating_add(1);
                    tracing::warn!(
                        error = %e,
                        operation = "capture_link",
                        streak = self.link_failure_streak,
                        "link capture failed; no link facts this cycle"
                    );
                    if self.link_failure_streak >= self.link_failure_limit {
                        self.table.write().await.degrade_links();
                    }
                }
            }

            match wireless {
                Ok(Some(text)) => {
                    let facts = parse::parse_wireless_info(&text);
                    self.table.write().await.apply_wireless(&facts);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        operation = "capture_wireless",
                        "wireless capture failed; readings stale this cycle"
                    );
                }
            }

            match route {
                Ok(Some(text)) => {
                    let gateways = parse::parse_routes(&text);
                    self.table.write().await.apply_routes(&gateways);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        operation = "capture_route",
                        "routing capture failed; gateways stale this cycle"
                    );
                }
            }
        })
    }
}
