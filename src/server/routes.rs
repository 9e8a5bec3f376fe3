use std::convert::Infallible;

use anyhow::anyhow;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse};
use axum::Json;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::error::ApiError;
use super::AppState;
use crate::lead::csv;
use crate::lead::filters::FilterCatalog;
use crate::lead::{Lead, SearchFilters};
use crate::pipeline::{self, ErrorEvent, StreamEvent};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Found {
        success: bool,
        leads: Vec<Lead>,
        #[serde(rename = "totalFound")]
        total_found: usize,
    },
    Rejected {
        success: bool,
        error: String,
        leads: Vec<Lead>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamParams {
    #[serde(default)]
    pub search_query: Option<String>,
    /// URL-encoded JSON `SearchFilters`
    #[serde(default)]
    pub filters: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Lead Scraper API is running",
    })
}

pub async fn filters() -> Json<FilterCatalog> {
    Json(FilterCatalog::default())
}

/// One-shot search: every batch, merged, in a single JSON reply.
pub async fn search_leads(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let raw_query = request.search_query.unwrap_or_default();
    let filters = request.filters.unwrap_or_default();
    let batch_count = state.pipeline.batch_count;
    let orchestrator = state.orchestrator.clone();

    // Run on its own task so a panic anywhere below becomes a 500.
    let result = tokio::spawn(async move {
        pipeline::search_leads(&orchestrator, &raw_query, &filters, batch_count).await
    })
    .await
    .map_err(|e| anyhow!("search task failed: {e}"))?;

    let response = match result {
        Ok(outcome) => SearchResponse::Found {
            success: true,
            leads: outcome.leads,
            total_found: outcome.total_found,
        },
        Err(e) => SearchResponse::Rejected {
            success: false,
            error: e.to_string(),
            leads: Vec::new(),
        },
    };
    Ok(Json(response))
}

/// Progressive search over server-sent events.
///
/// Emits one `{batch, leads, progress}` event per non-empty batch, or a
/// single `{error}` event, and always finishes with `data: [DONE]`. An
/// unreadable query string is reported the same way, not as a 400.
pub async fn search_stream(
    State(state): State<AppState>,
    params: Result<Query<StreamParams>, QueryRejection>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let started = params
        .map_err(|e| format!("Invalid query: {}", e.body_text()))
        .and_then(|Query(params)| start_stream(&state, params));

    let events: BoxStream<'static, StreamEvent> = match started {
        Ok(rx) => UnboundedReceiverStream::new(rx).boxed(),
        Err(message) => {
            tracing::warn!(error = %message, "rejected stream request");
            stream::iter([StreamEvent::Error(message), StreamEvent::Done]).boxed()
        }
    };

    Sse::new(events.map(|event| Ok(to_sse(event)))).keep_alive(KeepAlive::default())
}

fn start_stream(
    state: &AppState,
    params: StreamParams,
) -> Result<tokio::sync::mpsc::UnboundedReceiver<StreamEvent>, String> {
    let filters = match params.filters.as_deref().map(str::trim) {
        None | Some("") => SearchFilters::default(),
        Some(raw) => serde_json::from_str::<Option<SearchFilters>>(raw)
            .map(Option::unwrap_or_default)
            .map_err(|e| format!("Invalid filters: {e}"))?,
    };
    let raw_query = params.search_query.unwrap_or_default();

    pipeline::stream_leads(
        &state.orchestrator,
        &raw_query,
        filters,
        state.pipeline.stream_batch_count,
    )
    .map_err(|e| e.to_string())
}

fn to_sse(event: StreamEvent) -> Event {
    let encoded = match &event {
        StreamEvent::Batch(batch) => Event::default().json_data(batch),
        StreamEvent::Error(error) => Event::default().json_data(ErrorEvent {
            error: error.clone(),
        }),
        StreamEvent::Done => return Event::default().data(DONE_SENTINEL),
    };

    encoded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to encode stream event");
        Event::default().data(r#"{"error":"failed to encode event"}"#)
    })
}

/// Download the given leads as a CSV attachment.
pub async fn export_csv(
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let file_name = csv::file_name(chrono::Local::now().date_naive());
    tracing::info!(leads = request.leads.len(), file = %file_name, "exporting csv");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv::to_csv(&request.leads),
    ))
}
