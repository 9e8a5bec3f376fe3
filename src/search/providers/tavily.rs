use crate::config::SearchConfig;
use crate::search::{SearchDepth, SearchError, SearchOptions, SearchProvider, SearchResult, SearchResults};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TAVILY_BASE: &str = "https://api.tavily.com";

/// Tavily Search API provider
///
/// Documentation: https://docs.tavily.com/
pub struct TavilySearchProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

/// Tavily API request
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    include_answer: bool,
    max_results: usize,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilySearchProvider {
    pub fn new(config: &SearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build tavily http client, using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_TAVILY_BASE.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::InvalidApiKey);
        }

        let url = format!("{}/search", self.api_base.trim_end_matches('/'));

        tracing::debug!(
            query = %query,
            max_results = options.max_results,
            depth = ?options.depth,
            "performing tavily search"
        );

        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: options.depth,
            include_answer: options.include_answer,
            max_results: options.max_results,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "tavily search api error"
            );

            return match status.as_u16() {
                401 | 403 => Err(SearchError::InvalidApiKey),
                429 => Err(SearchError::RateLimitExceeded),
                _ => Err(SearchError::ApiError(format!(
                    "HTTP {}: {}",
                    status,
                    crate::logging::redact_secrets(&error_text)
                ))),
            };
        }

        let body: TavilyResponse = response.json().await?;

        let items: Vec<SearchResult> = body
            .results
            .into_iter()
            .take(options.max_results)
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect();

        tracing::debug!(
            query = %query,
            result_count = items.len(),
            "tavily search completed"
        );

        Ok(SearchResults {
            items,
            answer: body.answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_provider_contract() {
        let request = TavilyRequest {
            api_key: "tvly-key",
            query: "fintech in Germany",
            search_depth: SearchDepth::Advanced,
            include_answer: true,
            max_results: 10,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "api_key": "tvly-key",
                "query": "fintech in Germany",
                "search_depth": "advanced",
                "include_answer": true,
                "max_results": 10
            })
        );
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let body: TavilyResponse =
            serde_json::from_str(r#"{"results":[{"title":"t","url":"https://a.io"}]}"#).unwrap();
        assert!(body.answer.is_none());
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].content, "");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let provider = TavilySearchProvider::new(&SearchConfig::default());
        let err = provider
            .search("anything", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidApiKey));
    }
}
