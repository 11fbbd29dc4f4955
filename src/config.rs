use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Registry name of the backend to construct.
    #[serde(default = "default_backend")]
    pub backend: String,
    pub poll_interval_secs: u64,
    /// How often to log app stats (cycles completed/skipped) at INFO level.
    pub stats_log_interval_secs: u64,
    /// Consecutive failed link captures before all records degrade to
    /// not existing / not available.
    #[serde(default = "default_link_failure_limit")]
    pub link_failure_limit: u32,
    /// Interface names to monitor; empty means seed from discovery at startup.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

fn default_backend() -> String {
    "nettools".into()
}

fn default_link_failure_limit() -> u32 {
    3
}

/// Explicit tool paths; any omitted tool is searched in the standard system
/// directories instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsConfig {
    pub ifconfig: Option<String>,
    pub iwconfig: Option<String>,
    pub route: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of snapshots kept in the broadcast channel (slow observers
    /// may lag).
    pub broadcast_capacity: usize,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.poll_interval_secs > 0,
            "monitoring.poll_interval_secs must be > 0, got {}",
            self.monitoring.poll_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.link_failure_limit > 0,
            "monitoring.link_failure_limit must be > 0, got {}",
            self.monitoring.link_failure_limit
        );
        anyhow::ensure!(
            !self.monitoring.backend.is_empty(),
            "monitoring.backend must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.interfaces.iter().all(|n| !n.is_empty()),
            "monitoring.interfaces must not contain empty names"
        );
        for (key, path) in [
            ("tools.ifconfig", &self.tools.ifconfig),
            ("tools.iwconfig", &self.tools.iwconfig),
            ("tools.route", &self.tools.route),
        ] {
            anyhow::ensure!(
                path.as_deref() != Some(""),
                "{} must be non-empty when set",
                key
            );
        }
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        Ok(())
    }
}
