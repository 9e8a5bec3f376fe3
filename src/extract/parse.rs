use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::ExtractError;
use crate::lead::Lead;

/// Turn the model's free-text reply into lead records.
///
/// Cleanup steps, in order: drop code fences, cut the first balanced
/// `{...}` span, remove trailing commas before `}`/`]`, collapse newlines.
/// The reply must then parse as a JSON object with a `leads` array. Array
/// entries that are not usable leads are skipped, not fatal.
pub fn parse_leads(text: &str) -> Result<Vec<Lead>, ExtractError> {
    let cleaned = clean_response(text);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        tracing::debug!(
            error = %e,
            snippet = %cleaned.chars().take(500).collect::<String>(),
            "model reply is not valid JSON"
        );
        ExtractError::InvalidJson(e)
    })?;

    let Some(entries) = value.get("leads").and_then(Value::as_array) else {
        return Err(ExtractError::MissingLeads);
    };

    let mut leads = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<Lead>(entry.clone()) {
            Ok(lead) if !lead.company_name.trim().is_empty() => leads.push(lead),
            Ok(_) => tracing::warn!(index = idx, "skipping lead with blank companyName"),
            Err(e) => tracing::warn!(index = idx, error = %e, "skipping malformed lead"),
        }
    }

    Ok(leads)
}

/// Apply the textual cleanup without parsing.
pub fn clean_response(text: &str) -> String {
    let unfenced = strip_code_fences(text);
    let object = first_json_object(&unfenced).unwrap_or(unfenced.as_str());
    let no_trailing = trailing_comma_re().replace_all(object, "$1");

    no_trailing.replace('\n', " ").replace('\r', "").trim().to_string()
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"))
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// First top-level `{...}` span, found by brace matching that ignores
/// braces inside JSON strings. An unterminated object (truncated reply)
/// falls back to the span from the first `{` to the last `}`.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_reply_with_prose() {
        let reply = "Here are the companies:\n```json\n{\n  \"leads\": [\n    {\"companyName\": \"Acme\", \"website\": \"acme.com\"}\n  ]\n}\n```\nLet me know!";
        let leads = parse_leads(reply).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].company_name, "Acme");
    }

    #[test]
    fn removes_trailing_commas() {
        let reply = r#"{"leads": [{"companyName": "Acme", "leadScore": 80,}, ],}"#;
        let leads = parse_leads(reply).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].lead_score, Some(80));
    }

    #[test]
    fn ignores_braces_inside_strings_and_trailing_objects() {
        let reply = r#"{"leads": [{"companyName": "Curly {Braces} Co", "description": "uses } a lot"}]} {"note": "extra"}"#;
        let leads = parse_leads(reply).unwrap();
        assert_eq!(leads[0].company_name, "Curly {Braces} Co");
    }

    #[test]
    fn raw_newlines_inside_strings_are_collapsed() {
        let reply = "{\"leads\": [{\"companyName\": \"Acme\", \"description\": \"line one\nline two\"}]}";
        let leads = parse_leads(reply).unwrap();
        assert_eq!(leads[0].description, "line one line two");
    }

    #[test]
    fn missing_leads_array_is_an_error() {
        assert!(matches!(parse_leads(r#"{"companies": []}"#), Err(ExtractError::MissingLeads)));
        assert!(matches!(parse_leads(r#"{"leads": "none"}"#), Err(ExtractError::MissingLeads)));
    }

    #[test]
    fn non_json_reply_is_an_error() {
        assert!(matches!(
            parse_leads("I could not find any companies."),
            Err(ExtractError::InvalidJson(_))
        ));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let reply = r#"{"leads": [{"companyName": "Good"}, {"description": "no name"}, {"companyName": "  "}, 42]}"#;
        let leads = parse_leads(reply).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].company_name, "Good");
    }

    #[test]
    fn empty_leads_array_is_success() {
        assert!(parse_leads(r#"{"leads": []}"#).unwrap().is_empty());
    }

    #[test]
    fn unterminated_object_falls_back_to_last_brace() {
        assert_eq!(first_json_object(r#"x {"a": {"b": 1} y"#), Some(r#"{"a": {"b": 1}"#));
        assert_eq!(first_json_object("no braces"), None);
    }
}
