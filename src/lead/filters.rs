use serde::Serialize;

pub const FUNDING_STAGES: &[&str] = &["Pre-Seed", "Seed", "Series A", "Series B", "Series C", "Series D+"];

pub const INDUSTRIES: &[&str] = &[
    "SaaS",
    "FinTech",
    "HealthTech",
    "E-commerce",
    "AI/ML",
    "DeepTech",
    "EdTech",
    "CleanTech",
    "Cybersecurity",
    "Marketing Tech",
];

pub const COUNTRIES: &[&str] = &[
    "United States",
    "United Kingdom",
    "Canada",
    "Germany",
    "France",
    "India",
    "Singapore",
    "Australia",
    "Israel",
    "Netherlands",
];

pub const ICP_OPTIONS: &[&str] = &[
    "Enterprise (1000+ employees)",
    "Mid-Market (200-999 employees)",
    "SMB (50-199 employees)",
    "Startup (1-49 employees)",
];

pub const TIMEFRAMES: &[&str] = &[
    "24h",
    "48h",
    "7d",
    "30d",
    "90d",
    "2024-2025",
    "2023",
    "2022",
    "2020-2023",
    "2015-2020",
    "before-2015",
];

pub const COMPANY_AGES: &[&str] = &["new", "growing", "established", "mature"];

/// Option lists offered by the filter panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCatalog {
    pub icp: &'static [&'static str],
    pub funding_stages: &'static [&'static str],
    pub industries: &'static [&'static str],
    pub countries: &'static [&'static str],
    pub timeframes: &'static [&'static str],
    pub company_ages: &'static [&'static str],
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self {
            icp: ICP_OPTIONS,
            funding_stages: FUNDING_STAGES,
            industries: INDUSTRIES,
            countries: COUNTRIES,
            timeframes: TIMEFRAMES,
            company_ages: COMPANY_AGES,
        }
    }
}

/// Company-size bucket named by an ICP filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Enterprise,
    MidMarket,
    Smb,
    Startup,
}

impl Segment {
    const ALL: [Segment; 4] = [Segment::Enterprise, Segment::MidMarket, Segment::Smb, Segment::Startup];

    fn marker(&self) -> &'static str {
        match self {
            Segment::Enterprise => "Enterprise",
            Segment::MidMarket => "Mid-Market",
            Segment::Smb => "SMB",
            Segment::Startup => "Startup",
        }
    }

    /// Substrings of a head-count string that count as a match.
    ///
    /// This is a substring heuristic, not a parsed range: "1000" also matches
    /// "10000", and "10" matches "100-200".
    fn headcount_markers(&self) -> &'static [&'static str] {
        match self {
            Segment::Enterprise => &["1000", "1,000"],
            Segment::MidMarket => &["200", "500", "999"],
            Segment::Smb => &["50", "100", "199"],
            Segment::Startup => &["1-", "10", "20", "49"],
        }
    }

    /// Every bucket named in an ICP filter value (usually exactly one).
    pub fn parse_all(icp: &str) -> Vec<Segment> {
        Segment::ALL
            .into_iter()
            .filter(|s| icp.contains(s.marker()))
            .collect()
    }

    pub fn matches(&self, headcount: &str) -> bool {
        let headcount = headcount.to_lowercase();
        self.headcount_markers().iter().any(|m| headcount.contains(m))
    }
}
