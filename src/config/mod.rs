pub mod settings;
pub mod station;

pub use settings::{Config, LogRotation, LoggingConfig, PipelineConfig, SearchConfig, ServerConfig};
pub use station::Station;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "LEAD_SCRAPER_CONFIG";

/// Get the configuration file path
///
/// `LEAD_SCRAPER_CONFIG` wins; otherwise `<config_dir>/lead-scraper/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
        if !explicit.trim().is_empty() {
            return Ok(PathBuf::from(explicit));
        }
    }

    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("lead-scraper");

    Ok(config_dir.join("config.toml"))
}

/// Load configuration for the server process.
///
/// Defaults, then the toml file (if any), then `.env`, then environment
/// overrides for credentials and port.
pub fn load() -> Result<Config> {
    let path = config_path()?;
    let mut config = if path.exists() {
        load_from(&path)?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Config::default()
    };

    // A missing .env is the normal case outside development.
    if let Err(e) = dotenvy::dotenv() {
        tracing::trace!(error = %e, "no .env file loaded");
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Load configuration from a specific toml file
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content).context("Failed to write config file")?;
    Ok(())
}

/// Apply `ANTHROPIC_API_KEY`, `TAVILY_API_KEY` and `PORT`.
///
/// Takes a lookup function so tests don't have to mutate the process env.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|v| !v.trim().is_empty()) {
        config.anthropic.api_key = key;
    }
    if let Some(key) = lookup("TAVILY_API_KEY").filter(|v| !v.trim().is_empty()) {
        config.search.api_key = key;
    }
    if let Some(port) = lookup("PORT") {
        match port.trim().parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid PORT"),
        }
    }
}

/// Missing keys are not fatal: the affected adapter fails per call instead.
pub fn warn_missing_credentials(config: &Config) {
    if !config.anthropic.has_credentials() {
        tracing::warn!("ANTHROPIC_API_KEY not set, lead extraction will fail");
    }
    if config.search.api_key.trim().is_empty() {
        tracing::warn!("TAVILY_API_KEY not set, batches will run without search context");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_replace_credentials_and_port() {
        let env: HashMap<&str, &str> = [
            ("ANTHROPIC_API_KEY", "sk-ant-test"),
            ("TAVILY_API_KEY", "tvly-test"),
            ("PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.anthropic.api_key, "sk-ant-test");
        assert_eq!(config.search.api_key, "tvly-test");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn blank_keys_do_not_clobber_file_values() {
        let mut config = Config::default();
        config.search.api_key = "from-file".to_string();
        apply_env_overrides(&mut config, |k| (k == "TAVILY_API_KEY").then(|| "  ".to_string()));
        assert_eq!(config.search.api_key, "from-file");
    }

    #[test]
    fn save_then_load_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.pipeline.batch_count = 7;
        config.search.api_key = "tvly-x".to_string();
        save_config(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.pipeline.batch_count, 7);
        assert_eq!(loaded.search.api_key, "tvly-x");
        assert_eq!(loaded.server.port, 3001);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.server.host, "0.0.0.0");
        assert_eq!(loaded.pipeline.batch_count, 5);
        assert_eq!(loaded.anthropic.model, Station::default().model);
    }

    #[test]
    fn unparseable_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
