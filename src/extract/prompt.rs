//! Instruction payload sent to the model for one batch.
//!
//! Everything here is advisory text. The rules the service actually
//! guarantees (website shape, deny-listed domains, dedup) are enforced in
//! `lead::url` and `lead::merge` after the reply comes back.

use super::ExtractRequest;

pub const NO_SEARCH_RESULTS: &str = "No search results available.";

const RECENT_TIMEFRAMES: &[&str] = &["24h", "48h", "7d", "30d", "90d"];

const WEBSITE_RULES: &str = "\
WEBSITE VS SOURCE (read this first)

website = the company's own homepage, ROOT DOMAIN ONLY.
  correct: \"openai.com\", \"stripe.com\", \"acme-ai.com\"
  wrong:   \"https://openai.com\", \"www.stripe.com\", \"acme-ai.com/about\"
source = the FULL URL of the page where you found the company
  (article, directory entry, filing), e.g. \"https://news.example.org/acme-raises-seed\".

Formatting rules for website:
- no protocol (http://, https://)
- no \"www.\" prefix
- no path, query string or fragment
- never a news site, startup database, social network, blog platform or
  encyclopedia (techcrunch.com, crunchbase.com, linkedin.com, medium.com,
  wikipedia.org, ...): those belong in source
- if you cannot find the company's own domain, use \"N/A\"
";

const SIGNAL_TAXONOMY: &str = "\
BUSINESS SIGNALS

A signal is evidence that a company is active or growing. Tag each lead with
exactly one signalType from this closed set:
- funding: raised capital or announced a round
- hiring: open roles, recruiting pushes
- product_launch: launched or released a product or major feature
- expansion: new office, market or region
- partnership: strategic partnership, integration, alliance
- press_mention: featured coverage, award, recognition
- acquisition: acquired or was acquired
- regulatory_filing: SEC filings such as Form D / Reg D, S-1, 8-K
- none: no specific signal found
Put the supporting facts in signalData (e.g. stage, amount, investors, role
count, filing type) and the date of the signal in signalDate.
";

const SCORING_RUBRIC: &str = "\
LEAD SCORE (integer 0-100)

- Match with the search criteria, up to 40: industry +15, location +10,
  company size +10, overall relevance +5
- Signal strength, up to 30: larger rounds, more open roles, bigger partners,
  top-tier press and larger filings score higher
- Signal recency, up to 20: the more recent the better
- Data completeness, up to 10: verified website, dates and amounts
";

const OUTPUT_SCHEMA: &str = r#"Return ONLY valid JSON in exactly this shape:

{
  "leads": [
    {
      "companyName": "Exact company name",
      "description": "What the company does (1-2 sentences)",
      "industry": "Primary industry",
      "country": "Country name",
      "employeeCount": "e.g. 1-10, 11-50, 51-200, 201-500, 1000+",
      "fundingStage": "e.g. Seed, Series A, or N/A",
      "fundingAmount": "e.g. $5M or N/A",
      "fundingDate": "e.g. March 2024 or N/A",
      "activityDate": "YYYY-MM-DD of the most recent relevant activity or N/A",
      "foundedYear": "e.g. 2019 or N/A",
      "signalType": "funding",
      "signalData": { "stage": "Seed", "amount": "$5M", "investors": ["..."] },
      "signalDate": "March 2024",
      "website": "acme.com",
      "source": "https://news.example.org/acme-raises-5m",
      "leadScore": 85
    }
  ]
}
"#;

/// Assemble the full instruction text for one batch.
pub fn build_prompt(request: &ExtractRequest<'_>) -> String {
    let query = request.query;
    let filters = request.filters;
    let mut p = String::with_capacity(8 * 1024);

    p.push_str(WEBSITE_RULES);
    p.push('\n');

    p.push_str(
        "You are a sales lead researcher. Find real companies that match what the \
         user is looking for. The user may want recently funded companies, companies \
         of any age, companies in an industry or location, or companies of a given \
         size or stage. Do not require funding unless the user asks for it.\n\n",
    );

    p.push_str(SIGNAL_TAXONOMY);
    p.push('\n');

    p.push_str("USER REQUEST\n\n");
    p.push_str(&format!("Search query: \"{}\"\n", query.text));
    p.push_str(&format!("Industry: {}\n", filters.industry().unwrap_or("Any")));
    p.push_str(&format!("Country: {}\n", filters.country().unwrap_or("Any")));
    p.push_str(&format!("Funding stage: {}\n", filters.funding_stage().unwrap_or("Any")));
    p.push_str(&format!("Company size: {}\n", filters.icp().unwrap_or("Any")));
    p.push_str(&format!("Timeframe: {}\n", filters.timeframe().unwrap_or("Any Time")));
    p.push_str(&format!("Company age: {}\n", filters.company_age().unwrap_or("Any")));
    p.push('\n');

    p.push_str(&timeframe_rules(filters.timeframe(), request.today));
    p.push('\n');
    p.push_str(&company_age_rules(filters.company_age()));
    p.push('\n');

    if query.funding_intent {
        p.push_str(
            "FUNDING IS REQUIRED: every lead must have a verified funding round with \
             stage, amount and date. Prefer rounds from the last two years.\n\n",
        );
    } else {
        p.push_str(
            "Funding is optional. \"N/A\" is fine for fundingStage, fundingAmount and \
             fundingDate when the company has no known round.\n\n",
        );
    }

    p.push_str(SCORING_RUBRIC);
    p.push('\n');

    if request.batch_index > 0 {
        p.push_str(&format!(
            "BATCH {} OF {}\n\nEarlier batches already returned other companies. Return {} \
             DIFFERENT companies: look at lesser-known companies, other sub-categories or \
             regions, other time periods and other publications.\n\n",
            request.batch_index + 1,
            request.batch_count,
            request.batch_size
        ));
    }

    p.push_str("WEB SEARCH RESULTS\n\n");
    p.push_str(request.search_context.unwrap_or(NO_SEARCH_RESULTS));
    p.push_str("\n\n");

    p.push_str(OUTPUT_SCHEMA);
    p.push('\n');

    let focus = query.focus();
    p.push_str("FINAL CHECK\n");
    p.push_str(&format!("- Is this query about STARTUPS? {}\n", yes_no(query.startup_intent)));
    p.push_str(&format!("- Is this query about FUNDING? {}\n", yes_no(query.funding_intent)));
    p.push_str(&format!("- Query type: {}\n", focus.label()));
    if !query.startup_intent && !query.funding_intent {
        p.push_str("- This is a general business search: do NOT require startup status or funding.\n");
    }
    p.push_str(&format!(
        "- Every company must actually match \"{}\".\n\nReturn {} companies, every criterion matched, diverse sources, verified data.\n",
        query.text, request.batch_size
    ));

    p
}

fn timeframe_rules(timeframe: Option<&str>, today: chrono::NaiveDate) -> String {
    let today = today.format("%Y-%m-%d");
    match timeframe {
        Some(t) if RECENT_TIMEFRAMES.contains(&t) => format!(
            "TIMEFRAME {t}: include ONLY activity, announcements or filings inside that \
             window. Be strict about dates. Today is {today}.\n"
        ),
        Some("before-2015") => "TIMEFRAME before-2015: find established companies founded before \
             2015 with a 10+ year history. Recent activity is not required.\n"
            .to_string(),
        Some(t) => format!(
            "TIMEFRAME {t}: include only companies or activity from those years and \
             verify the year before including a lead.\n"
        ),
        None => "TIMEFRAME any: no date restriction. Do not favor recent companies over old ones.\n"
            .to_string(),
    }
}

fn company_age_rules(age: Option<&str>) -> String {
    let rule = match age.map(str::to_ascii_lowercase).as_deref() {
        Some("new") => "COMPANY AGE new: founded within the last 2 years.",
        Some("growing") => "COMPANY AGE growing: 3-5 years old.",
        Some("established") => "COMPANY AGE established: 6-10 years old.",
        Some("mature") => "COMPANY AGE mature: more than 10 years old.",
        Some(_) | None => "COMPANY AGE any: no age restriction.",
    };
    format!(
        "{rule} Age is measured from the founding date, not from the latest funding round.\n"
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::{query::enhance_for_year, SearchFilters};

    fn today() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn includes_query_context_and_schema() {
        let filters = SearchFilters::default();
        let query = enhance_for_year("restaurants in NYC", &filters, 2025).unwrap();
        let request = ExtractRequest {
            query: &query,
            filters: &filters,
            search_context: Some(r#"[{"title":"Best NYC spots"}]"#),
            batch_index: 0,
            batch_count: 5,
            batch_size: 10,
            today: today(),
        };

        let prompt = build_prompt(&request);
        assert!(prompt.contains("Search query: \"restaurants in NYC\""));
        assert!(prompt.contains("Best NYC spots"));
        assert!(prompt.contains("\"leads\""));
        assert!(prompt.contains("Query type: GENERAL BUSINESS SEARCH"));
        assert!(prompt.contains("Funding is optional"));
        assert!(!prompt.contains("BATCH 1 OF"));
    }

    #[test]
    fn later_batches_ask_for_different_companies() {
        let filters = SearchFilters::default();
        let query = enhance_for_year("Seed fintech", &filters, 2025).unwrap();
        let request = ExtractRequest {
            query: &query,
            filters: &filters,
            search_context: None,
            batch_index: 2,
            batch_count: 5,
            batch_size: 10,
            today: today(),
        };

        let prompt = build_prompt(&request);
        assert!(prompt.contains("BATCH 3 OF 5"));
        assert!(prompt.contains(NO_SEARCH_RESULTS));
        assert!(prompt.contains("FUNDING IS REQUIRED"));
    }

    #[test]
    fn user_request_lists_each_filter_on_its_own_line() {
        let filters = SearchFilters {
            industry: Some("Fintech".to_string()),
            country: Some("Germany".to_string()),
            timeframe: Some("30d".to_string()),
            ..Default::default()
        };
        let query = enhance_for_year("payments", &filters, 2025).unwrap();
        let request = ExtractRequest {
            query: &query,
            filters: &filters,
            search_context: None,
            batch_index: 1,
            batch_count: 2,
            batch_size: 10,
            today: today(),
        };

        let prompt = build_prompt(&request);
        assert!(prompt.contains(
            "Industry: Fintech\nCountry: Germany\nFunding stage: Any\nCompany size: Any\n\
             Timeframe: 30d\nCompany age: Any\n\nTIMEFRAME 30d"
        ));
        assert!(prompt.contains("other publications.\n\nWEB SEARCH RESULTS\n\n"));
        assert!(prompt.ends_with("verified data.\n"));
    }

    #[test]
    fn timeframe_rules_cover_each_kind() {
        assert!(timeframe_rules(Some("48h"), today()).contains("Today is 2025-06-01"));
        assert!(timeframe_rules(Some("before-2015"), today()).contains("founded before"));
        assert!(timeframe_rules(Some("2023"), today()).contains("TIMEFRAME 2023"));
        assert!(timeframe_rules(None, today()).contains("no date restriction"));
    }

    #[test]
    fn company_age_rules_are_case_insensitive() {
        assert!(company_age_rules(Some("Mature")).contains("more than 10 years"));
        assert!(company_age_rules(Some("whatever")).contains("no age restriction"));
    }
}
