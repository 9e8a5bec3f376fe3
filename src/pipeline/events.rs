use serde::Serialize;

use crate::lead::Lead;

/// One settled batch, as sent to streaming clients.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEvent {
    /// One-based batch number
    pub batch: usize,
    pub leads: Vec<Lead>,
    /// 0-100
    pub progress: u8,
}

/// Payload of an `{error}` stream event.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub error: String,
}

#[derive(Debug, Clone)]
pub enum StreamEvent {
    Batch(BatchEvent),
    Error(String),
    /// All batches settled
    Done,
}
