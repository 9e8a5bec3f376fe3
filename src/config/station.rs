use serde::{Deserialize, Serialize};

pub const DEFAULT_ANTHROPIC_BASE: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 12000;

/// A "station" represents one LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Optional custom API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 - 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: Some(DEFAULT_ANTHROPIC_BASE.to_string()),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: None,
        }
    }
}

impl Station {
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_ANTHROPIC_BASE)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
