use crate::config::station::Station;
use crate::llm::types::{ApiErrorBody, CreateMessageRequest, CreateMessageResponse, Message};
use crate::llm::LlmError;
use reqwest::Client;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    station: Station,
}

impl AnthropicClient {
    pub fn new(station: Station) -> Self {
        // Generation of a full batch can take well over a minute.
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, station }
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Send a single user message and wait for the complete reply.
    pub async fn create_message(&self, prompt: String) -> Result<CreateMessageResponse, LlmError> {
        if !self.station.has_credentials() {
            return Err(LlmError::MissingApiKey);
        }

        let api_base = self.station.api_base().trim_end_matches('/');
        let url = format!("{}/v1/messages", api_base);

        tracing::debug!(
            api_base = %api_base,
            model = %self.station.model,
            max_tokens = self.station.max_tokens(),
            prompt_chars = prompt.len(),
            "anthropic create_message request"
        );

        let request_body = CreateMessageRequest {
            model: self.station.model.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.station.max_tokens(),
            temperature: self.station.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.station.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "anthropic api returned error"
            );

            let details = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.summary())
                .unwrap_or(error_text);

            let message = match status.as_u16() {
                401 => format!("Unauthorized (401): Invalid or missing Anthropic API key. Details: {}", details),
                429 => format!("Rate Limit Exceeded (429): {}", details),
                400 => format!("Bad Request (400): {}", details),
                500..=599 => format!("Server Error ({}): The Anthropic API is experiencing issues. Details: {}", status, details),
                _ => format!("API request failed ({}): {}", status, details),
            };

            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreateMessageResponse = response.json().await?;

        if let Some(usage) = body.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = ?body.stop_reason,
                "anthropic create_message completed"
            );
        }

        Ok(body)
    }
}
