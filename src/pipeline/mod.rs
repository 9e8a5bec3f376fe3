//! Query → batches → merged leads.

pub mod events;
pub mod orchestrator;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::lead::{enhance, merge_leads, Lead, QueryError, SearchFilters};

pub use events::{BatchEvent, ErrorEvent, StreamEvent};
pub use orchestrator::{progress, BatchOrchestrator, BatchOutcome};

/// Final result of a one-shot search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub leads: Vec<Lead>,
    pub total_found: usize,
}

/// Enhance the query, run every batch, merge the results.
///
/// The only error is an empty query, which is raised before any upstream
/// call is made.
pub async fn search_leads(
    orchestrator: &BatchOrchestrator,
    raw_query: &str,
    filters: &SearchFilters,
    batch_count: usize,
) -> Result<SearchOutcome, QueryError> {
    let query = enhance(raw_query, filters)?;
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("search_leads", %request_id);

    async move {
        tracing::info!(
            original = %query.original,
            enhanced = %query.text,
            focus = query.focus().label(),
            unconstrained = filters.is_unconstrained(),
            "query enhanced"
        );

        let raw = orchestrator.run(&query, filters, batch_count).await;
        let (leads, stats) = merge_leads(raw, filters);

        tracing::info!(
            received = stats.received,
            filtered_by_segment = stats.filtered_by_segment,
            duplicates = stats.duplicates,
            websites_rewritten = stats.websites_rewritten,
            kept = stats.kept,
            "search finished"
        );

        Ok(SearchOutcome {
            total_found: leads.len(),
            leads,
        })
    }
    .instrument(span)
    .await
}

/// Enhance the query and start the streaming variant.
pub fn stream_leads(
    orchestrator: &BatchOrchestrator,
    raw_query: &str,
    filters: SearchFilters,
    batch_count: usize,
) -> Result<mpsc::UnboundedReceiver<StreamEvent>, QueryError> {
    let query = enhance(raw_query, &filters)?;
    let request_id = uuid::Uuid::new_v4();
    let _guard = tracing::info_span!("stream_leads", %request_id).entered();

    tracing::info!(
        original = %query.original,
        enhanced = %query.text,
        batches = batch_count,
        "starting lead stream"
    );
    Ok(orchestrator.stream(query, filters, batch_count))
}
