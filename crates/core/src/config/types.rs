use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the Beam Ebooks metadata source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the site, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Delay between starting successive detail workers (milliseconds).
    /// Keeps concurrent dispatch from bursting the remote site.
    #[serde(default = "default_dispatch_delay")]
    pub dispatch_delay_ms: u64,

    /// How often the orchestrator polls running workers (milliseconds).
    /// The abort flag is observed once per polling pass.
    #[serde(default = "default_poll_interval")]
    pub worker_poll_interval_ms: u64,
}

fn default_base_url() -> String {
    "http://www.beam-ebooks.de".to_string()
}

fn default_fetch_timeout() -> u64 {
    20
}

fn default_dispatch_delay() -> u64 {
    100
}

fn default_poll_interval() -> u64 {
    50
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_timeout_secs: default_fetch_timeout(),
            dispatch_delay_ms: default_dispatch_delay(),
            worker_poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),
}
