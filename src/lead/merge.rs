use std::collections::HashSet;

use super::filters::Segment;
use super::types::{Lead, SearchFilters};
use super::url;

/// Counters from one merge pass, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub received: usize,
    pub filtered_by_segment: usize,
    pub duplicates: usize,
    pub websites_rewritten: usize,
    pub kept: usize,
}

/// Segment filter, first-seen-wins dedup and website validation.
///
/// Holds the set of names already emitted, so feeding batches one at a time
/// (streaming) dedups across batches exactly like a single merged call.
#[derive(Debug, Default)]
pub struct LeadMerger {
    /// Set whenever an ICP filter is present, even one naming no known bucket.
    segment_filter: bool,
    segments: Vec<Segment>,
    seen: HashSet<String>,
}

impl LeadMerger {
    pub fn new(filters: &SearchFilters) -> Self {
        let segments = filters.icp().map(Segment::parse_all).unwrap_or_default();
        if let Some(icp) = filters.icp() {
            if segments.is_empty() {
                tracing::warn!(icp = %icp, "icp filter names no known segment; every lead will be dropped");
            }
        }

        Self {
            segment_filter: filters.icp().is_some(),
            segments,
            seen: HashSet::new(),
        }
    }

    /// Merge the next run of leads; output keeps input order.
    pub fn absorb(&mut self, leads: Vec<Lead>) -> (Vec<Lead>, MergeStats) {
        let mut stats = MergeStats {
            received: leads.len(),
            ..Default::default()
        };
        let mut out = Vec::with_capacity(leads.len());
        for mut lead in leads {
            if self.segment_filter && !self.in_segment(&lead) {
                stats.filtered_by_segment += 1;
                continue;
            }

            if !self.seen.insert(lead.dedup_key()) {
                stats.duplicates += 1;
                continue;
            }

            let normalized = url::normalize_website(&lead.website);
            if normalized != lead.website {
                tracing::debug!(
                    company = %lead.company_name,
                    before = %lead.website,
                    after = %normalized,
                    "website rewritten"
                );
                lead.website = normalized;
                stats.websites_rewritten += 1;
            }

            out.push(lead);
        }

        stats.kept = out.len();
        tracing::debug!(?stats, "merged leads");
        (out, stats)
    }

    fn in_segment(&self, lead: &Lead) -> bool {
        let Some(headcount) = lead.headcount() else {
            return false;
        };
        self.segments.iter().any(|s| s.matches(headcount))
    }
}

/// One-shot merge of a complete lead list.
pub fn merge_leads(leads: Vec<Lead>, filters: &SearchFilters) -> (Vec<Lead>, MergeStats) {
    LeadMerger::new(filters).absorb(leads)
}
