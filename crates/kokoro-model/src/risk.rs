use chrono::NaiveDateTime;
use schemars::{JsonSchema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// Severity bucket assigned by the remote model.
///
/// Levels the client does not know are kept verbatim in [`RiskLevel::Other`] so a newer server never
/// breaks result parsing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl RiskLevel {
    /// Levels the service documents, from least to most severe.
    pub const KNOWN: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Other(level) => level,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RiskLevel {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<RiskLevel> for String {
    fn from(value: RiskLevel) -> Self {
        match value {
            RiskLevel::Other(level) => level,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for RiskLevel {
    fn schema_name() -> Cow<'static, str> {
        "RiskLevel".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> schemars::Schema {
        let examples: Vec<&str> = Self::KNOWN.iter().map(Self::as_str).collect();
        json_schema!({
            "type": "string",
            "examples": examples
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct RiskResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// # Risk score between 0 and 100
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// # Model confidence between 0 and 1
    pub confidence_score: f64,
    #[serde(default)]
    pub contributing_factors: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_at: Option<NaiveDateTime>,
}
