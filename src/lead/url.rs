//! Website field normalization.
//!
//! The model is asked to put a bare company domain in `website`, but it
//! regularly returns full URLs or the domain of the article it read. `clean`
//! reduces a candidate to `label.tld`; `is_valid` rejects anything that is
//! still URL-shaped or belongs to a known content/aggregator site.

/// Sentinel for "no usable value".
pub const NOT_AVAILABLE: &str = "N/A";

/// Domains that are sources of information, never a company's own site.
///
/// Matched as case-insensitive substrings, so short entries such as `x.com`
/// and `ft.com` also reject longer domains that merely contain them.
pub const NON_COMPANY_DOMAINS: &[&str] = &[
    // Placeholder/test domains
    "example.com",
    "company.com",
    "startup.com",
    "business.com",
    "test.com",
    "demo.com",
    "placeholder.com",
    // News
    "techcrunch.com",
    "bloomberg.com",
    "forbes.com",
    "venturebeat.com",
    "theverge.com",
    "wired.com",
    "reuters.com",
    "wsj.com",
    "ft.com",
    "theinformation.com",
    "techmeme.com",
    "businessinsider.com",
    "cnbc.com",
    "techradar.com",
    // Startup databases and directories
    "crunchbase.com",
    "pitchbook.com",
    "producthunt.com",
    "ycombinator.com",
    "angellist.com",
    "wellfound.com",
    // Social
    "linkedin.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
    // Blogging platforms
    "medium.com",
    "substack.com",
    "wordpress.com",
    "blogger.com",
    "tumblr.com",
    "ghost.io",
    "notion.site",
    "hashnode.com",
    "dev.to",
    // Content sites frequently mistaken for company homepages
    "mashed.com",
    "thetakeout.com",
    "wikipedia.org",
    "autoevolution.com",
    "eatthis.com",
    "tastingtable.com",
    "delish.com",
    "eater.com",
];

/// Reduce a URL-ish string to a bare lower-case domain, or "N/A".
pub fn clean(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return NOT_AVAILABLE.to_string();
    }

    let mut cleaned = strip_prefix_ignore_case(trimmed, "https://")
        .or_else(|| strip_prefix_ignore_case(trimmed, "http://"))
        .unwrap_or(trimmed);
    cleaned = strip_prefix_ignore_case(cleaned, "www.").unwrap_or(cleaned);

    let end = cleaned.find(['/', '?', '#']).unwrap_or(cleaned.len());
    let cleaned = cleaned[..end].trim_end_matches('.').to_ascii_lowercase();

    if !has_domain_shape(&cleaned) {
        tracing::debug!(input = %url, "could not extract a bare domain");
        return NOT_AVAILABLE.to_string();
    }

    cleaned
}

/// Whether `website` is acceptable as a company homepage. "N/A" always is.
pub fn is_valid(website: &str) -> bool {
    let website = website.trim();
    if website.is_empty() || website == NOT_AVAILABLE {
        return true;
    }

    let lower = website.to_ascii_lowercase();

    if lower.starts_with("http://") || lower.starts_with("https://") || lower.contains("://") {
        tracing::debug!(website = %website, "rejected: contains protocol");
        return false;
    }
    if lower.starts_with("www.") {
        tracing::debug!(website = %website, "rejected: contains www.");
        return false;
    }
    if website.contains(['/', '?', '#']) {
        tracing::debug!(website = %website, "rejected: contains path, query or fragment");
        return false;
    }

    if let Some(domain) = NON_COMPANY_DOMAINS.iter().find(|d| lower.contains(**d)) {
        tracing::debug!(website = %website, matched = %domain, "rejected: source domain in website field");
        return false;
    }

    if !has_domain_shape(website) {
        tracing::debug!(website = %website, "rejected: invalid domain format");
        return false;
    }

    true
}

/// `clean` then `is_valid`; anything that fails becomes "N/A".
pub fn normalize_website(website: &str) -> String {
    let cleaned = clean(website);
    if is_valid(&cleaned) {
        cleaned
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// `label.tld`: label of ASCII letters, digits and hyphens; tld of at least
/// two ASCII letters. Exactly one dot.
fn has_domain_shape(candidate: &str) -> bool {
    let Some((label, tld)) = candidate.split_once('.') else {
        return false;
    };

    !label.is_empty()
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && tld.len() >= 2
        && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_protocol_www_path_and_query() {
        assert_eq!(clean("https://WWW.Example.COM/path?x=1"), "example.com");
        assert_eq!(clean("http://acme-ai.com/about"), "acme-ai.com");
        assert_eq!(clean("stripe.com#pricing"), "stripe.com");
        assert_eq!(clean("openai.com."), "openai.com");
    }

    #[test]
    fn clean_returns_na_for_empty_and_garbage() {
        assert_eq!(clean(""), "N/A");
        assert_eq!(clean("  "), "N/A");
        assert_eq!(clean("N/A"), "N/A");
        assert_eq!(clean("not a domain"), "N/A");
        assert_eq!(clean("localhost"), "N/A");
        assert_eq!(clean("acme.co.uk"), "N/A");
        assert_eq!(clean("acme.c0m"), "N/A");
    }

    #[test]
    fn na_is_always_valid() {
        assert!(is_valid("N/A"));
        assert!(is_valid(""));
    }

    #[test]
    fn deny_listed_domains_are_rejected() {
        assert!(!is_valid("blog.medium.com"));
        assert!(!is_valid("techcrunch.com"));
        assert!(!is_valid("TechCrunch.com"));
        assert!(!is_valid("crunchbase.com"));
        for domain in NON_COMPANY_DOMAINS {
            assert!(!is_valid(domain), "{domain} should be rejected");
        }
    }

    #[test]
    fn url_shaped_values_are_rejected() {
        assert!(!is_valid("https://stripe.com"));
        assert!(!is_valid("www.stripe.com"));
        assert!(!is_valid("stripe.com/about"));
        assert!(!is_valid("stripe.com?ref=1"));
        assert!(!is_valid("stripe.com#top"));
    }

    #[test]
    fn company_domains_are_valid() {
        assert!(is_valid("stripe.com"));
        assert!(is_valid("donandmillies.com"));
        assert!(is_valid("acme-ai.io"));
    }

    #[test]
    fn substring_matching_also_catches_longer_domains() {
        // Known limitation of substring matching.
        assert!(!is_valid("fedex.com"));
        assert!(!is_valid("microsoft.com"));
    }

    #[test]
    fn validation_has_no_hidden_state() {
        for input in ["https://www.stripe.com/x", "techcrunch.com", "", "garbage"] {
            let cleaned = clean(input);
            assert_eq!(is_valid(&cleaned), is_valid(&cleaned));
        }
    }

    #[test]
    fn normalize_rewrites_sources_to_na() {
        assert_eq!(normalize_website("https://techcrunch.com/2024/acme"), "N/A");
        assert_eq!(normalize_website("https://www.acme.com/"), "acme.com");
        assert_eq!(normalize_website("N/A"), "N/A");
    }
}
