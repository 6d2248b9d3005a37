use crate::response::ResponseSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct AssessmentSubmission {
    pub questionnaire_id: String,
    pub responses: ResponseSet,
}

/// Reply to a submission. Only the assessment id is needed to fetch the full result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct SubmissionReceipt {
    pub assessment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct StartAssessment {
    pub questionnaire_id: String,
}
