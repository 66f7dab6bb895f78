use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    /// Host name prefixed to every exported metric path.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Sampling interval; also the denominator for `for N seconds`
    /// windows.
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: u64,
    /// Rule files to load at startup.
    #[serde(default)]
    pub rule_files: Vec<PathBuf>,
    /// Upper bound on concurrently evaluating rules per tick.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Timeout for one init-backend service lookup.
    #[serde(default = "default_service_timeout")]
    pub service_timeout_secs: u64,
    /// Optional `host:port` to push statsd lines to each cycle.
    pub statsd_endpoint: Option<String>,
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_cycle_seconds() -> u64 {
    15
}

fn default_worker_count() -> usize {
    4
}

fn default_service_timeout() -> u64 {
    2
}

impl AgentConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
