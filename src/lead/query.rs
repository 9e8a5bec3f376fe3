use chrono::Datelike;

use super::types::SearchFilters;

/// Terms that mark a query as being about fundraising.
pub const FUNDING_KEYWORDS: &[&str] = &[
    "funded",
    "funding",
    "raised",
    "investment",
    "series",
    "seed",
    "venture",
    "capital",
];

/// Terms that mark a query as being about startups ("startup" also covers "startups").
pub const STARTUP_KEYWORDS: &[&str] = &["startup", "startups"];

const STARTUP_SUFFIX: &str = "startup entrepreneurship";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Please enter a search query")]
    EmptyQuery,
}

/// What the user appears to be looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFocus {
    StartupFocused,
    FundingFocused,
    GeneralBusinessSearch,
}

impl QueryFocus {
    pub fn label(&self) -> &'static str {
        match self {
            QueryFocus::StartupFocused => "STARTUP-FOCUSED",
            QueryFocus::FundingFocused => "FUNDING-FOCUSED",
            QueryFocus::GeneralBusinessSearch => "GENERAL BUSINESS SEARCH",
        }
    }
}

/// The user's query plus filter- and intent-derived terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedQuery {
    /// Trimmed user input
    pub original: String,
    /// String sent to the search provider and quoted to the model
    pub text: String,
    pub funding_intent: bool,
    pub startup_intent: bool,
}

impl EnhancedQuery {
    pub fn focus(&self) -> QueryFocus {
        if self.startup_intent {
            QueryFocus::StartupFocused
        } else if self.funding_intent {
            QueryFocus::FundingFocused
        } else {
            QueryFocus::GeneralBusinessSearch
        }
    }
}

/// Build the enhanced search string for `raw`.
///
/// Purely additive: the trimmed user query always comes first and unchanged.
pub fn enhance(raw: &str, filters: &SearchFilters) -> Result<EnhancedQuery, QueryError> {
    enhance_for_year(raw, filters, chrono::Utc::now().year())
}

/// Same as [`enhance`] with the reference year for the funding window pinned.
pub fn enhance_for_year(
    raw: &str,
    filters: &SearchFilters,
    year: i32,
) -> Result<EnhancedQuery, QueryError> {
    let original = raw.trim();
    if original.is_empty() {
        return Err(QueryError::EmptyQuery);
    }

    let lower = original.to_lowercase();
    let funding_intent = FUNDING_KEYWORDS.iter().any(|k| lower.contains(k))
        || filters.funding_stage().is_some();
    let startup_intent = STARTUP_KEYWORDS.iter().any(|k| lower.contains(k));

    let mut text = original.to_string();

    if let Some(industry) = filters.industry() {
        text.push(' ');
        text.push_str(industry);
    }

    if let Some(country) = filters.country() {
        text.push_str(" in ");
        text.push_str(country);
    }

    if funding_intent {
        if let Some(stage) = filters.funding_stage() {
            text.push(' ');
            text.push_str(stage);
        }
        text.push(' ');
        text.push_str(&funding_suffix(year));
    }

    if startup_intent {
        text.push(' ');
        text.push_str(STARTUP_SUFFIX);
    }

    tracing::debug!(
        original = %original,
        enhanced = %text,
        funding_intent,
        startup_intent,
        "query enhanced"
    );

    Ok(EnhancedQuery {
        original: original.to_string(),
        text,
        funding_intent,
        startup_intent,
    })
}

/// Funding boilerplate pinned to the last two calendar years.
pub fn funding_suffix(year: i32) -> String {
    format!("funding investment raised capital {} {}", year - 1, year)
}
