//! Lead records and the deterministic rules applied to them.

pub mod csv;
pub mod filters;
pub mod merge;
pub mod query;
pub mod types;
pub mod url;

pub use merge::{merge_leads, LeadMerger, MergeStats};
pub use query::{enhance, EnhancedQuery, QueryError, QueryFocus};
pub use types::{Lead, SearchFilters, SignalType};
