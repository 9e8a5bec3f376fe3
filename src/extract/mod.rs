pub mod parse;
pub mod prompt;

use crate::lead::{EnhancedQuery, Lead, SearchFilters};
use crate::llm::{AnthropicClient, LlmError};

pub use parse::parse_leads;
pub use prompt::build_prompt;

/// Everything one batch sends to the model.
#[derive(Debug, Clone)]
pub struct ExtractRequest<'a> {
    pub query: &'a EnhancedQuery,
    pub filters: &'a SearchFilters,
    /// Serialized search results; `None` when the search step failed
    pub search_context: Option<&'a str>,
    /// Zero-based
    pub batch_index: usize,
    pub batch_count: usize,
    /// Leads requested from this batch
    pub batch_size: usize,
    pub today: chrono::NaiveDate,
}

/// Extraction errors
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("model reply contained no text block")]
    NoTextBlock,

    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("model reply has no `leads` array")]
    MissingLeads,
}

/// Turns a batch's search context into lead records.
#[async_trait::async_trait]
pub trait LeadExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractRequest<'_>) -> Result<Vec<Lead>, ExtractError>;
}

/// Extractor backed by the Anthropic messages API.
#[derive(Clone)]
pub struct AnthropicExtractor {
    client: AnthropicClient,
}

impl AnthropicExtractor {
    pub fn new(client: AnthropicClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl LeadExtractor for AnthropicExtractor {
    async fn extract(&self, request: &ExtractRequest<'_>) -> Result<Vec<Lead>, ExtractError> {
        let prompt = build_prompt(request);
        let response = self.client.create_message(prompt).await?;

        let text = response.first_text().ok_or(ExtractError::NoTextBlock)?;
        let leads = parse_leads(text)?;

        tracing::debug!(
            batch = request.batch_index + 1,
            model = %self.client.station().model,
            leads = leads.len(),
            stop_reason = ?response.stop_reason,
            "extracted leads"
        );
        Ok(leads)
    }
}
