use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub u32);

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a vendor is already approved internally or sourced from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "INT")]
    Internal,
    #[serde(rename = "EXT")]
    External,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "INT",
            Self::External => "EXT",
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INT" | "INTERNAL" => Ok(Self::Internal),
            "EXT" | "EXTERNAL" => Ok(Self::External),
            other => Err(format!("unsupported vendor source `{other}` (expected INT|EXT)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Other(String),
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low risk" | "low" => Self::Low,
            "medium risk" | "medium" | "moderate" => Self::Medium,
            "high risk" | "high" => Self::High,
            _ => Self::Other(value),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(value: RiskLevel) -> Self {
        match value {
            RiskLevel::Low => "Low Risk".to_string(),
            RiskLevel::Medium => "Medium Risk".to_string(),
            RiskLevel::High => "High Risk".to_string(),
            RiskLevel::Other(label) => label,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalHistory {
    pub partner_since: i32,
    pub lifetime_spend: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub description: String,
}

/// One sourcing candidate as delivered by the vendor feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub source: Source,
    #[serde(default)]
    pub is_current_partner: bool,
    #[serde(default)]
    pub is_preferred: bool,
    #[serde(default)]
    pub is_best_value: bool,
    #[serde(default)]
    pub is_fastest: bool,
    pub unit_price: Decimal,
    #[serde(default)]
    pub total_est_cost: Decimal,
    #[serde(default)]
    pub available_qty: u64,
    /// Spend attributed to this vendor on the geographic view.
    #[serde(default, alias = "total_spend")]
    pub total_spend: Option<Decimal>,
    pub region: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub lead_time: String,
    #[serde(default)]
    pub shelf_life: String,
    #[serde(default)]
    pub packaging: String,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub locking: String,
    pub suitability_score: u8,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub internal_history: Option<InternalHistory>,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Vendor {
    pub fn lifetime_spend(&self) -> Decimal {
        self.internal_history.as_ref().map(|history| history.lifetime_spend).unwrap_or_default()
    }

    pub fn spend_contribution(&self) -> Decimal {
        self.total_spend.unwrap_or_default()
    }

    pub fn holds_certification(&self, certification: &str) -> bool {
        self.certifications.iter().any(|held| held == certification)
    }

    /// Leading integer of the lead-time label, e.g. `"2 Weeks"` -> `Some(2)`.
    pub fn lead_time_weeks(&self) -> Option<i64> {
        parse_leading_integer(&self.lead_time)
    }
}

pub fn parse_leading_integer(label: &str) -> Option<i64> {
    let trimmed = label.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let end = digits.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[cfg(test)]
mod tests {
    use super::{parse_leading_integer, RiskLevel, Source};

    #[test]
    fn lead_time_parses_leading_numeral_only() {
        assert_eq!(parse_leading_integer("2 Weeks"), Some(2));
        assert_eq!(parse_leading_integer("  12weeks"), Some(12));
        assert_eq!(parse_leading_integer("1 Week"), Some(1));
        assert_eq!(parse_leading_integer("-3 weeks"), Some(-3));
        assert_eq!(parse_leading_integer("Weeks 2"), None);
        assert_eq!(parse_leading_integer(""), None);
        assert_eq!(parse_leading_integer("-"), None);
    }

    #[test]
    fn risk_level_keeps_unknown_labels() {
        assert_eq!(RiskLevel::from("Low Risk".to_string()), RiskLevel::Low);
        assert_eq!(RiskLevel::from("MEDIUM RISK".to_string()), RiskLevel::Medium);
        assert_eq!(
            RiskLevel::from("Under Review".to_string()),
            RiskLevel::Other("Under Review".to_string())
        );
        assert_eq!(String::from(RiskLevel::High), "High Risk");
    }

    #[test]
    fn source_parses_short_and_long_forms() {
        assert_eq!("int".parse::<Source>(), Ok(Source::Internal));
        assert_eq!("External".parse::<Source>(), Ok(Source::External));
        assert!("partner".parse::<Source>().is_err());
    }

    #[test]
    fn source_serializes_as_feed_code() {
        let json = serde_json::to_string(&Source::Internal).expect("serialize source");
        assert_eq!(json, "\"INT\"");
    }
}
