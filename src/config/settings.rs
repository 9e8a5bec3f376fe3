use serde::{Deserialize, Serialize};

use super::station::Station;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM used for lead extraction
    #[serde(default)]
    pub anthropic: Station,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Web search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider name (only "tavily" today)
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// "basic" or "advanced"
    #[serde(default = "default_search_depth")]
    pub search_depth: String,

    #[serde(default = "default_true")]
    pub include_answer: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            api_base: None,
            max_results: default_max_results(),
            search_depth: default_search_depth(),
            include_answer: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Batch fan-out sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Batches launched by the one-shot endpoint
    #[serde(default = "default_batch_count")]
    pub batch_count: usize,

    /// Batches launched by the streaming endpoint (kept small to finish
    /// inside short platform request limits)
    #[serde(default = "default_stream_batch_count")]
    pub stream_batch_count: usize,

    /// Leads requested from the model per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_count: default_batch_count(),
            stream_batch_count: default_stream_batch_count(),
            batch_size: default_batch_size(),
        }
    }
}

/// Where log output goes and how noisy it is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to this file instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default)]
    pub rotation: LogRotation,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            rotation: LogRotation::default(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// One file, appended to across restarts.
    #[default]
    None,
    /// New file per day (`<name>.YYYY-MM-DD`).
    Daily,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_provider() -> String {
    "tavily".to_string()
}

fn default_max_results() -> usize {
    10
}

fn default_search_depth() -> String {
    "advanced".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_count() -> usize {
    5
}

fn default_stream_batch_count() -> usize {
    2
}

fn default_batch_size() -> usize {
    10
}

fn default_log_level() -> String {
    "lead_scraper=info,tower_http=info,warn".to_string()
}
