//! Common test utilities: scripted upstream adapters and lead fixtures

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lead_scraper::config::PipelineConfig;
use lead_scraper::extract::{ExtractError, ExtractRequest, LeadExtractor};
use lead_scraper::lead::Lead;
use lead_scraper::pipeline::BatchOrchestrator;
use lead_scraper::search::{SearchError, SearchOptions, SearchProvider, SearchResult, SearchResults};
use lead_scraper::server::AppState;

/// Lead with a name and website, everything else defaulted
pub fn lead(name: &str, website: &str) -> Lead {
    Lead::named(name).with_website(website)
}

/// `count` distinct leads named `{prefix} 0`, `{prefix} 1`, ...
pub fn leads(prefix: &str, count: usize) -> Vec<Lead> {
    (0..count)
        .map(|i| lead(&format!("{prefix} {i}"), &format!("{}{}.com", prefix.to_lowercase().replace(' ', "-"), i)))
        .collect()
}

/// Search provider that returns a fixed result list, or fails every call
pub struct MockSearch {
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, _options: &SearchOptions) -> Result<SearchResults, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        if self.fail {
            return Err(SearchError::ApiError("mock search failure".to_string()));
        }

        Ok(SearchResults {
            items: vec![SearchResult {
                title: "Top companies".to_string(),
                url: "https://news.example.org/top".to_string(),
                content: "A list of companies".to_string(),
            }],
            answer: None,
        })
    }
}

type Responder = dyn Fn(usize) -> Option<Vec<Lead>> + Send + Sync;

/// Extractor whose reply is scripted per batch index.
///
/// `None` from the responder simulates an extraction failure.
pub struct MockExtractor {
    responder: Box<Responder>,
    /// Per-batch artificial latency, by index
    delays: Vec<u64>,
    calls: AtomicUsize,
    contexts: Mutex<Vec<(usize, Option<String>)>>,
}

impl MockExtractor {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(usize) -> Option<Vec<Lead>> + Send + Sync + 'static,
    {
        Self::with_delays(responder, Vec::new())
    }

    pub fn with_delays<F>(responder: F, delays_ms: Vec<u64>) -> Arc<Self>
    where
        F: Fn(usize) -> Option<Vec<Lead>> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            delays: delays_ms,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Search context each batch received, sorted by batch index
    pub fn contexts(&self) -> Vec<(usize, Option<String>)> {
        let mut contexts = self.contexts.lock().unwrap().clone();
        contexts.sort_by_key(|(index, _)| *index);
        contexts
    }
}

#[async_trait::async_trait]
impl LeadExtractor for MockExtractor {
    async fn extract(&self, request: &ExtractRequest<'_>) -> Result<Vec<Lead>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts
            .lock()
            .unwrap()
            .push((request.batch_index, request.search_context.map(str::to_string)));

        if let Some(ms) = self.delays.get(request.batch_index) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }

        (self.responder)(request.batch_index).ok_or(ExtractError::MissingLeads)
    }
}

pub fn orchestrator(search: Arc<MockSearch>, extractor: Arc<MockExtractor>) -> BatchOrchestrator {
    BatchOrchestrator::new(search, extractor, SearchOptions::default(), 10)
}

pub fn app_state(search: Arc<MockSearch>, extractor: Arc<MockExtractor>) -> AppState {
    AppState::new(orchestrator(search, extractor), PipelineConfig::default())
}
