use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored assessment as the history endpoint reports it. Responses are kept as raw json since
/// older assessments may not follow the current response shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct AssessmentRecord {
    pub id: String,
    #[serde(default)]
    pub responses: Map<String, Value>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct AssessmentHistory {
    pub count: usize,
    pub assessments: Vec<AssessmentRecord>,
}
