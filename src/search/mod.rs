pub mod providers;

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// Search provider abstraction - different providers can be plugged in
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a search query with given options
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResults, SearchError>;
}

/// How hard the provider should look
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" => SearchDepth::Basic,
            _ => SearchDepth::Advanced,
        }
    }
}

/// Search options for controlling results
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results to return (default: 10)
    pub max_results: usize,
    pub depth: SearchDepth,
    /// Ask the provider for a short synthesized answer alongside results
    pub include_answer: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            depth: SearchDepth::Advanced,
            include_answer: true,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            depth: SearchDepth::parse(&config.search_depth),
            include_answer: config.include_answer,
        }
    }
}

/// Search results container
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// Individual search result items
    pub items: Vec<SearchResult>,
    /// Provider's synthesized answer, when requested and available
    pub answer: Option<String>,
}

impl SearchResults {
    /// Serialize for inclusion in an LLM prompt.
    ///
    /// A bare JSON array of results, or `{"answer", "results"}` when the
    /// provider returned a non-blank answer.
    pub fn to_context(&self) -> String {
        let value = match self.answer.as_deref().map(str::trim) {
            Some(answer) if !answer.is_empty() => serde_json::json!({
                "answer": answer,
                "results": self.items,
            }),
            _ => serde_json::json!(self.items),
        };
        value.to_string()
    }
}

/// Individual search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Extracted page content / snippet
    pub content: String,
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid API key")]
    InvalidApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_parsing_defaults_to_advanced() {
        assert_eq!(SearchDepth::parse("basic"), SearchDepth::Basic);
        assert_eq!(SearchDepth::parse(" BASIC "), SearchDepth::Basic);
        assert_eq!(SearchDepth::parse("advanced"), SearchDepth::Advanced);
        assert_eq!(SearchDepth::parse("deep"), SearchDepth::Advanced);
    }

    #[test]
    fn context_is_json_array_of_results() {
        let results = SearchResults {
            items: vec![SearchResult {
                title: "Acme raises seed".to_string(),
                url: "https://news.example.org/acme".to_string(),
                content: "Acme announced...".to_string(),
            }],
            answer: None,
        };

        let parsed: serde_json::Value = serde_json::from_str(&results.to_context()).unwrap();
        assert_eq!(parsed[0]["title"], "Acme raises seed");
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn context_carries_provider_answer() {
        let results = SearchResults {
            items: vec![SearchResult {
                title: "Acme raises seed".to_string(),
                url: "https://news.example.org/acme".to_string(),
                content: "Acme announced...".to_string(),
            }],
            answer: Some("Acme raised $4M in March.".to_string()),
        };

        let parsed: serde_json::Value = serde_json::from_str(&results.to_context()).unwrap();
        assert_eq!(parsed["answer"], "Acme raised $4M in March.");
        assert_eq!(parsed["results"][0]["url"], "https://news.example.org/acme");
    }

    #[test]
    fn blank_answer_is_left_out() {
        let results = SearchResults {
            items: Vec::new(),
            answer: Some("  ".to_string()),
        };
        assert_eq!(results.to_context(), "[]");
    }
}
