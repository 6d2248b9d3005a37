use kokoro_core::FlowError;
use kokoro_core::flow::pipeline::{self, PipelineError, Stage};
use kokoro_model::submission::AssessmentSubmission;
use kokoro_test_helpers::{MockBackend, fixtures, not_found};
use test_log::test;

fn submission() -> AssessmentSubmission {
    AssessmentSubmission {
        questionnaire_id: "phq9".to_owned(),
        responses: [("q1", 1), ("q2", 3)].into_iter().collect(),
    }
}

#[test(tokio::test)]
async fn test_submit_returns_assessment_id() {
    let backend = MockBackend::new().with_assessment_id("a-42");
    let assessment_id = pipeline::submit(&backend, &submission()).await.unwrap();
    assert_eq!(assessment_id, "a-42");
    assert_eq!(backend.submissions(), vec![submission()]);
    assert_eq!(backend.result_calls(), 0);

    let result = pipeline::fetch_result(&backend, &assessment_id).await.unwrap();
    assert_eq!(result, fixtures::medium_risk());
    assert_eq!(backend.result_requests(), vec!["a-42".to_owned()]);
}

#[test(tokio::test)]
async fn test_submit_failure_has_no_assessment_id() {
    let backend = MockBackend::new();
    backend.fail_next_submit(1);
    let err = pipeline::submit(&backend, &submission()).await.unwrap_err();
    assert_eq!(err.stage, Stage::Submit);
    assert!(err.assessment_id.is_none());
    assert!(FlowError::from(err).is_retryable());
}

#[test(tokio::test)]
async fn test_result_failure_reports_assessment_id() {
    let backend = MockBackend::new();
    backend.fail_next_result(1);
    let err = pipeline::fetch_result(&backend, "abc123").await.unwrap_err();
    assert_eq!(err.stage, Stage::FetchResult);
    assert_eq!(err.assessment_id.as_deref(), Some("abc123"));
    assert_eq!(err.to_string(), format!("fetch-result stage failed: {}", err.source));
    assert!(FlowError::from(err).is_retryable());
}

#[test(tokio::test)]
async fn test_unknown_assessment_is_not_retryable() {
    let backend = MockBackend::new();
    let err = pipeline::fetch_result(&backend, "missing").await.unwrap_err();
    assert!(err.source.is_not_found());
    assert_eq!(err.assessment_id.as_deref(), Some("missing"));

    let err = FlowError::from(err);
    assert!(!err.is_retryable());
    assert_eq!(err.message(), "The assessment service does not know the requested item.");
}

#[test]
fn test_rejected_submission_is_not_retryable() {
    let err = FlowError::from(PipelineError {
        stage: Stage::Submit,
        assessment_id: None,
        source: not_found("questionnaire"),
    });
    assert!(!err.is_retryable());
    assert_eq!(err.message(), "The assessment service does not know the requested item.");
}

#[test(tokio::test)]
async fn test_custom_result_is_passed_through() {
    let mut result = fixtures::medium_risk();
    result.risk_level = "severe".into();
    result.contributing_factors.clear();
    let backend = MockBackend::new().with_result(result.clone());
    let assessment_id = pipeline::submit(&backend, &submission()).await.unwrap();
    assert_eq!(pipeline::fetch_result(&backend, &assessment_id).await.unwrap(), result);
}
