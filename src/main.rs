use anyhow::Result;
use lead_scraper::config::{self, Config};
use lead_scraper::{logging, server};

const INIT_CONFIG_FLAG: &str = "--init-config";

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().skip(1).any(|arg| arg == INIT_CONFIG_FLAG) {
        let path = config::config_path()?;
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        config::save_config(&Config::default(), &path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = config::load()?;
    let _log_guard = logging::init(&config.logging)?;
    config::warn_missing_credentials(&config);

    tracing::info!(
        model = %config.anthropic.model,
        batches = config.pipeline.batch_count,
        stream_batches = config.pipeline.stream_batch_count,
        "starting lead scraper"
    );

    server::serve(&config).await
}
