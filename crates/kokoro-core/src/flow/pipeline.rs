use crate::backend::AssessmentBackend;
use kokoro::error::Error;
use kokoro_model::risk::RiskResult;
use kokoro_model::submission::AssessmentSubmission;
use strum::Display;
use thiserror::Error;

/// The two dependent remote calls of a submission, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Submit,
    FetchResult,
}

#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    /// Known once the submit stage succeeded. Retrying with it skips the submission.
    pub assessment_id: Option<String>,
    pub source: Error,
}

/// Submit stage: posts the responses and returns the id of the assessment the service created.
///
/// The caller keeps the id before starting [`fetch_result`], so a retry never creates a second
/// assessment.
pub async fn submit<B: AssessmentBackend + ?Sized>(
    backend: &B,
    submission: &AssessmentSubmission,
) -> Result<String, PipelineError> {
    let receipt = backend
        .submit_assessment(submission)
        .await
        .map_err(|source| PipelineError {
            stage: Stage::Submit,
            assessment_id: None,
            source,
        })?;
    tracing::debug!(assessment_id = %receipt.assessment_id, "Assessment submitted");
    Ok(receipt.assessment_id)
}

pub async fn fetch_result<B: AssessmentBackend + ?Sized>(
    backend: &B,
    assessment_id: &str,
) -> Result<RiskResult, PipelineError> {
    backend
        .get_risk_result(assessment_id)
        .await
        .map_err(|source| PipelineError {
            stage: Stage::FetchResult,
            assessment_id: Some(assessment_id.to_owned()),
            source,
        })
}
