use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::url::NOT_AVAILABLE;

/// One candidate company returned to the user.
///
/// Field names follow the camelCase wire format the model is asked to emit.
/// Anything the model adds beyond the known fields (`activityDate`,
/// `foundedYear`, ...) is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub company_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,

    /// Head-count bucket as the model phrased it, e.g. "10-50"
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,

    #[serde(default = "not_available", deserialize_with = "lenient_na")]
    pub funding_stage: String,

    #[serde(default = "not_available", deserialize_with = "lenient_na")]
    pub funding_amount: String,

    #[serde(default = "not_available", deserialize_with = "lenient_na")]
    pub funding_date: String,

    #[serde(default, deserialize_with = "lenient_signal_type")]
    pub signal_type: SignalType,

    #[serde(default, deserialize_with = "lenient_object")]
    pub signal_data: Map<String, Value>,

    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub signal_date: Option<String>,

    /// Nominally 0-100; out-of-range values are passed through.
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub lead_score: Option<i64>,

    /// Bare company domain or "N/A"
    #[serde(default = "not_available", deserialize_with = "lenient_na")]
    pub website: String,

    /// Full URL or platform name where the lead was found
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    /// Minimal lead with every optional field at its default.
    pub fn named(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            description: String::new(),
            industry: String::new(),
            country: String::new(),
            employee_count: None,
            company_size: None,
            funding_stage: not_available(),
            funding_amount: not_available(),
            funding_date: not_available(),
            signal_type: SignalType::None,
            signal_data: Map::new(),
            signal_date: None,
            lead_score: None,
            website: not_available(),
            source: String::new(),
            extra: Map::new(),
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    pub fn with_employee_count(mut self, count: impl Into<String>) -> Self {
        self.employee_count = Some(count.into());
        self
    }

    /// Dedup key: lower-cased, trimmed company name.
    pub fn dedup_key(&self) -> String {
        self.company_name.trim().to_lowercase()
    }

    /// Head-count text used by the segment filter.
    pub fn headcount(&self) -> Option<&str> {
        self.employee_count
            .as_deref()
            .or(self.company_size.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Tagged category of business-activity evidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Funding,
    Hiring,
    ProductLaunch,
    Expansion,
    Partnership,
    PressMention,
    Acquisition,
    RegulatoryFiling,
    #[default]
    None,
}

impl SignalType {
    pub const ALL: [SignalType; 9] = [
        SignalType::Funding,
        SignalType::Hiring,
        SignalType::ProductLaunch,
        SignalType::Expansion,
        SignalType::Partnership,
        SignalType::PressMention,
        SignalType::Acquisition,
        SignalType::RegulatoryFiling,
        SignalType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Funding => "funding",
            SignalType::Hiring => "hiring",
            SignalType::ProductLaunch => "product_launch",
            SignalType::Expansion => "expansion",
            SignalType::Partnership => "partnership",
            SignalType::PressMention => "press_mention",
            SignalType::Acquisition => "acquisition",
            SignalType::RegulatoryFiling => "regulatory_filing",
            SignalType::None => "none",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let signal = match normalized.as_str() {
            "funding" => SignalType::Funding,
            "hiring" => SignalType::Hiring,
            "product_launch" | "product" | "launch" => SignalType::ProductLaunch,
            "expansion" => SignalType::Expansion,
            "partnership" => SignalType::Partnership,
            "press_mention" | "press" => SignalType::PressMention,
            "acquisition" => SignalType::Acquisition,
            "regulatory_filing" | "regulatory" | "filing" => SignalType::RegulatoryFiling,
            "none" | "" => SignalType::None,
            _ => return Err(()),
        };
        Ok(signal)
    }
}

/// Optional search constraints; absent or blank means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub icp: Option<String>,
    pub funding_stage: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub timeframe: Option<String>,
    pub company_age: Option<String>,
}

impl SearchFilters {
    pub fn icp(&self) -> Option<&str> {
        non_blank(&self.icp)
    }

    pub fn funding_stage(&self) -> Option<&str> {
        non_blank(&self.funding_stage)
    }

    pub fn industry(&self) -> Option<&str> {
        non_blank(&self.industry)
    }

    pub fn country(&self) -> Option<&str> {
        non_blank(&self.country)
    }

    pub fn timeframe(&self) -> Option<&str> {
        non_blank(&self.timeframe)
    }

    pub fn company_age(&self) -> Option<&str> {
        non_blank(&self.company_age)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.icp().is_none()
            && self.funding_stage().is_none()
            && self.industry().is_none()
            && self.country().is_none()
            && self.timeframe().is_none()
            && self.company_age().is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .and_then(value_to_string)
        .unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(value_to_string))
}

fn lenient_na<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .and_then(value_to_string)
        .unwrap_or_else(not_available))
}

fn lenient_object<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}

fn lenient_signal_type<'de, D: Deserializer<'de>>(d: D) -> Result<SignalType, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .and_then(value_to_string)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

fn lenient_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    })
}
