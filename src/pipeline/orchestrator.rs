use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tracing::Instrument;

use super::events::{BatchEvent, StreamEvent};
use crate::extract::{ExtractRequest, LeadExtractor};
use crate::lead::{EnhancedQuery, Lead, LeadMerger, SearchFilters};
use crate::search::{SearchOptions, SearchProvider};

/// Result of one search + extract round. Never an error: failures show up
/// as `success == false` with no leads.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Zero-based
    pub index: usize,
    pub success: bool,
    pub leads: Vec<Lead>,
}

impl BatchOutcome {
    fn failed(index: usize) -> Self {
        Self {
            index,
            success: false,
            leads: Vec::new(),
        }
    }
}

/// Fans a query out into independent batches and gathers what they find.
///
/// Batches share no mutable state; each runs its own search and parses its
/// own reply. A failing batch contributes nothing and never fails the others.
#[derive(Clone)]
pub struct BatchOrchestrator {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn LeadExtractor>,
    options: SearchOptions,
    batch_size: usize,
}

impl BatchOrchestrator {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn LeadExtractor>,
        options: SearchOptions,
        batch_size: usize,
    ) -> Self {
        Self {
            search,
            extractor,
            options,
            batch_size,
        }
    }

    /// Run one batch to completion.
    pub async fn run_batch(
        &self,
        query: &EnhancedQuery,
        filters: &SearchFilters,
        index: usize,
        batch_count: usize,
    ) -> BatchOutcome {
        let started = Instant::now();
        let batch = index + 1;

        let context = match self.search.search(&query.text, &self.options).await {
            Ok(results) if results.items.is_empty() => {
                tracing::debug!(batch, "search returned no results");
                None
            }
            Ok(results) => {
                tracing::debug!(batch, results = results.items.len(), "search completed");
                Some(results.to_context())
            }
            Err(e) => {
                tracing::warn!(batch, error = %e, "search failed; continuing without context");
                None
            }
        };

        let request = ExtractRequest {
            query,
            filters,
            search_context: context.as_deref(),
            batch_index: index,
            batch_count,
            batch_size: self.batch_size,
            today: chrono::Local::now().date_naive(),
        };

        match self.extractor.extract(&request).await {
            Ok(mut leads) => {
                if leads.len() > self.batch_size {
                    tracing::debug!(batch, returned = leads.len(), "truncating oversized batch");
                    leads.truncate(self.batch_size);
                }
                tracing::info!(
                    batch,
                    leads = leads.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "batch completed"
                );
                BatchOutcome {
                    index,
                    success: true,
                    leads,
                }
            }
            Err(e) => {
                tracing::warn!(
                    batch,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "batch failed"
                );
                BatchOutcome::failed(index)
            }
        }
    }

    /// Run `batch_count` batches concurrently and concatenate the leads of
    /// the successful ones in batch order. Leads are not merged here.
    pub async fn run(
        &self,
        query: &EnhancedQuery,
        filters: &SearchFilters,
        batch_count: usize,
    ) -> Vec<Lead> {
        let started = Instant::now();
        tracing::info!(batches = batch_count, query = %query.text, "starting batches");

        let outcomes = join_all(
            (0..batch_count).map(|index| self.run_batch(query, filters, index, batch_count)),
        )
        .await;

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        let leads: Vec<Lead> = outcomes
            .into_iter()
            .filter(|o| o.success)
            .flat_map(|o| o.leads)
            .collect();

        tracing::info!(
            batches = batch_count,
            succeeded,
            leads = leads.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all batches settled"
        );
        leads
    }

    /// Start the streaming variant.
    ///
    /// Each batch is merged into a shared `LeadMerger` as it settles, so
    /// dedup and website rules hold across the whole stream. Batches that
    /// fail or end empty after merging emit nothing. The receiver always
    /// ends with `StreamEvent::Done` unless it is dropped first.
    pub fn stream(
        &self,
        query: EnhancedQuery,
        filters: SearchFilters,
        batch_count: usize,
    ) -> mpsc::UnboundedReceiver<StreamEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = self.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let mut merger = LeadMerger::new(&filters);
            let mut pending: FuturesUnordered<_> = (0..batch_count)
                .map(|index| this.run_batch(&query, &filters, index, batch_count))
                .collect();

            let mut completed = 0usize;
            let mut emitted = 0usize;
            while let Some(outcome) = pending.next().await {
                completed += 1;
                if !outcome.success {
                    continue;
                }

                let (leads, stats) = merger.absorb(outcome.leads);
                if leads.is_empty() {
                    tracing::debug!(batch = outcome.index + 1, ?stats, "batch empty after merge");
                    continue;
                }

                emitted += leads.len();
                let event = BatchEvent {
                    batch: outcome.index + 1,
                    leads,
                    progress: progress(completed, batch_count),
                };
                if tx.send(StreamEvent::Batch(event)).is_err() {
                    tracing::debug!("stream receiver dropped");
                    return;
                }
            }

            tracing::info!(
                batches = batch_count,
                leads = emitted,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "stream completed"
            );
            let _ = tx.send(StreamEvent::Done);
        }
        .instrument(tracing::Span::current()));

        rx
    }
}

/// Percentage of settled batches, rounded.
pub fn progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(progress(1, 2), 50);
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(2, 3), 67);
        assert_eq!(progress(5, 5), 100);
        assert_eq!(progress(0, 0), 100);
    }
}
