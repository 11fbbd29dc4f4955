// Raw source readers: locate the external net-tools utilities and capture
// their complete output, one query per source kind per cycle.

use crate::parse;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::process::Command;

const SEARCH_DIRS: &[&str] = &["/sbin", "/usr/sbin", "/usr/local/sbin", "/bin", "/usr/bin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Link,
    Wireless,
    Route,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SourceKind::Link => "link",
            SourceKind::Wireless => "wireless",
            SourceKind::Route => "route",
        })
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    /// A capture of this kind is already running (overlapping cycle guard).
    #[error("{0} capture already running")]
    Busy(SourceKind),
    #[error("failed to launch {tool}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct ToolRepo {
    link: PathBuf,
    wireless: Option<PathBuf>,
    route: Option<PathBuf>,
    link_busy: AtomicBool,
    wireless_busy: AtomicBool,
    route_busy: AtomicBool,
}

impl ToolRepo {
    /// Resolves tool paths: explicit config paths win, otherwise the standard
    /// system directories are searched. The link tool is required; a missing
    /// wireless or routing tool disables that source.
    pub fn locate(config: &crate::config::ToolsConfig) -> anyhow::Result<Self> {
        let link = match &config.ifconfig {
            Some(p) => PathBuf::from(p),
            None => find_tool("ifconfig").ok_or_else(|| {
                anyhow::anyhow!(
                    "ifconfig not found in {:?}; set tools.ifconfig",
                    SEARCH_DIRS
                )
            })?,
        };
        Ok(Self {
            link,
            wireless: locate_optional(&config.iwconfig, "iwconfig"),
            route: locate_optional(&config.route, "route"),
            link_busy: AtomicBool::new(false),
            wireless_busy: AtomicBool::new(false),
            route_busy: AtomicBool::new(false),
        })
    }

    /// Runs one query for the given source and returns its complete output.
    /// `Ok(None)` means the source is disabled (no tool); the wireless and
    /// routing tools get stderr merged in, since iwconfig reports
    /// "no wireless extensions" there.
    pub async fn capture(&self, kind: SourceKind) -> Result<Option<String>, ToolError> {
        let (path, busy, args, merge_stderr) = match kind {
            SourceKind::Link => (Some(&self.link), &self.link_busy, &["-a"][..], false),
            SourceKind::Wireless => (self.wireless.as_ref(), &self.wireless_busy, &[][..], true),
            SourceKind::Route => (self.route.as_ref(), &self.route_busy, &["-n"][..], true),
        };
        let Some(path) = path else {
            return Ok(None);
        };
        let _guard = BusyGuard::acquire(busy).ok_or(ToolError::Busy(kind))?;

        let mut command = Command::new(path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if merge_stderr {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            // Dropping the in-flight capture (cycle aborted at shutdown)
            // terminates the child; its partial output is never applied.
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| ToolError::Launch {
            tool: path.display().to_string(),
            source: e,
        })?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ToolError::Launch {
                tool: path.display().to_string(),
                source: e,
            })?;

        let mut buffer = String::from_utf8_lossy(&output.stdout).into_owned();
        if merge_stderr {
            buffer.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(Some(buffer))
    }

    /// One-shot link capture used at startup to seed the monitored set when
    /// configuration names no interfaces. Loopback is excluded.
    pub async fn discover_interfaces(&self) -> anyhow::Result<Vec<String>> {
        let text = self
            .capture(SourceKind::Link)
            .await
            .map_err(|e| anyhow::anyhow!("interface discovery: {e}"))?
            .unwrap_or_default();
        let mut names: Vec<String> = parse::parse_link_info(&text)
            .into_keys()
            .filter(|n| n != "lo")
            .collect();
        names.sort();
        Ok(names)
    }
}

fn locate_optional(configured: &Option<String>, name: &str) -> Option<PathBuf> {
    match configured {
        Some(p) => Some(PathBuf::from(p)),
        None => {
            let found = find_tool(name);
            if found.is_none() {
                tracing::warn!(tool = name, "tool not found; source disabled");
            }
            found
        }
    }
}

fn find_tool(name: &str) -> Option<PathBuf> {
    SEARCH_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .find(|p| p.is_file())
}

/// Releases the per-kind busy flag even when the capture future is dropped
/// mid-flight, so an aborted cycle cannot wedge the next one.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
