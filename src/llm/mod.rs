pub mod anthropic;
pub mod types;

pub use anthropic::AnthropicClient;

/// LLM-related errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Missing API key: set ANTHROPIC_API_KEY or anthropic.api_key")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}
