use super::types::Lead;

pub const CSV_HEADERS: [&str; 11] = [
    "Company Name",
    "Description",
    "Funding Stage",
    "Funding Amount",
    "Funding Date",
    "Industry",
    "Country",
    "Company Size",
    "Lead Score",
    "Source",
    "Website",
];

/// Render leads as a UTF-8 CSV document, header row first.
///
/// The description is always quoted; other fields are quoted only when they
/// contain a comma, quote or line break.
pub fn to_csv(leads: &[Lead]) -> String {
    let mut out = CSV_HEADERS.join(",");

    for lead in leads {
        let size = lead
            .company_size
            .as_deref()
            .or(lead.employee_count.as_deref())
            .unwrap_or("");
        let score = lead.lead_score.map(|s| s.to_string()).unwrap_or_default();

        let row = [
            escape(&lead.company_name),
            quote(&lead.description),
            escape(&lead.funding_stage),
            escape(&lead.funding_amount),
            escape(&lead.funding_date),
            escape(&lead.industry),
            escape(&lead.country),
            escape(size),
            score,
            escape(&lead.source),
            escape(&lead.website),
        ];

        out.push('\n');
        out.push_str(&row.join(","));
    }

    out
}

/// Download name for an export made on `date`.
pub fn file_name(date: chrono::NaiveDate) -> String {
    format!("leads_{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}
