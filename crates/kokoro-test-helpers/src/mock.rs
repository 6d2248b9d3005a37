use crate::fixtures;
use async_trait::async_trait;
use http::StatusCode;
use kokoro::error::{Error, HttpError};
use kokoro_core::AssessmentBackend;
use kokoro_model::questionnaire::{Questionnaire, QuestionnaireSummary};
use kokoro_model::risk::RiskResult;
use kokoro_model::submission::{AssessmentSubmission, SubmissionReceipt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

/// Error the mock returns for scripted failures, shaped like an unavailable server.
#[must_use]
pub fn network_failure() -> Error {
    Error::Http(HttpError::Transport(kokoro_http::Error::StatusCode {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: "mock failure".to_owned(),
    }))
}

/// Error the mock returns for ids it does not know.
#[must_use]
pub fn not_found(what: &str) -> Error {
    Error::Http(HttpError::Transport(kokoro_http::Error::StatusCode {
        status: StatusCode::NOT_FOUND,
        body: format!("{what} not found"),
    }))
}

#[derive(Default)]
struct Script {
    questionnaires: Vec<Questionnaire>,
    assessment_id: String,
    result: Option<RiskResult>,
    fail_list: usize,
    fail_fetch: usize,
    fail_submit: usize,
    fail_result: usize,
    submissions: Vec<AssessmentSubmission>,
    result_requests: Vec<String>,
}

fn take_failure(counter: &mut usize) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

#[derive(Default)]
struct Calls {
    list: AtomicUsize,
    fetch: AtomicUsize,
    submit: AtomicUsize,
    result: AtomicUsize,
}

/// Scripted stand-in for the assessment service.
///
/// Serves the questionnaires it was given, answers every submission with the configured assessment
/// id and every result request with the configured result. Failures are scripted per endpoint with
/// the `fail_next_*` methods and consumed in order.
pub struct MockBackend {
    script: Mutex<Script>,
    calls: Calls,
    submit_gate: Option<Arc<Notify>>,
    result_gate: Option<Arc<Notify>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                assessment_id: "abc123".to_owned(),
                result: Some(fixtures::medium_risk()),
                ..Script::default()
            }),
            calls: Calls::default(),
            submit_gate: None,
            result_gate: None,
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn with_questionnaire(self, questionnaire: Questionnaire) -> Self {
        self.script().questionnaires.push(questionnaire);
        self
    }

    #[must_use]
    pub fn with_assessment_id(self, assessment_id: &str) -> Self {
        assessment_id.clone_into(&mut self.script().assessment_id);
        self
    }

    #[must_use]
    pub fn with_result(self, result: RiskResult) -> Self {
        self.script().result = Some(result);
        self
    }

    /// Every submission waits until the returned handle is notified once per call.
    #[must_use]
    pub fn hold_submissions(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.submit_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Every result request waits until the returned handle is notified once per call.
    #[must_use]
    pub fn hold_results(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.result_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn fail_next_list(&self, times: usize) {
        self.script().fail_list += times;
    }

    pub fn fail_next_fetch(&self, times: usize) {
        self.script().fail_fetch += times;
    }

    pub fn fail_next_submit(&self, times: usize) {
        self.script().fail_submit += times;
    }

    pub fn fail_next_result(&self, times: usize) {
        self.script().fail_result += times;
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.calls.fetch.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn submit_calls(&self) -> usize {
        self.calls.submit.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn result_calls(&self) -> usize {
        self.calls.result.load(Ordering::SeqCst)
    }

    /// Submissions in the order they arrived, including failed ones.
    #[must_use]
    pub fn submissions(&self) -> Vec<AssessmentSubmission> {
        self.script().submissions.clone()
    }

    #[must_use]
    pub fn result_requests(&self) -> Vec<String> {
        self.script().result_requests.clone()
    }
}

#[async_trait]
impl AssessmentBackend for MockBackend {
    async fn list_questionnaires(&self) -> Result<Vec<QuestionnaireSummary>, Error> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script();
        if take_failure(&mut script.fail_list) {
            return Err(network_failure());
        }
        Ok(script.questionnaires.iter().map(Questionnaire::summary).collect())
    }

    async fn get_questionnaire(&self, questionnaire_id: &str) -> Result<Questionnaire, Error> {
        self.calls.fetch.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script();
        if take_failure(&mut script.fail_fetch) {
            return Err(network_failure());
        }
        script
            .questionnaires
            .iter()
            .find(|questionnaire| questionnaire.id == questionnaire_id)
            .cloned()
            .ok_or_else(|| not_found("questionnaire"))
    }

    async fn submit_assessment(&self, submission: &AssessmentSubmission) -> Result<SubmissionReceipt, Error> {
        self.calls.submit.fetch_add(1, Ordering::SeqCst);
        self.script().submissions.push(submission.clone());
        if let Some(gate) = &self.submit_gate {
            gate.notified().await;
        }
        let mut script = self.script();
        if take_failure(&mut script.fail_submit) {
            return Err(network_failure());
        }
        tracing::debug!(assessment_id = %script.assessment_id, "Mock submission accepted");
        Ok(SubmissionReceipt {
            assessment_id: script.assessment_id.clone(),
            status: Some("completed".to_owned()),
            risk_level: None,
            risk_score: None,
        })
    }

    async fn get_risk_result(&self, assessment_id: &str) -> Result<RiskResult, Error> {
        self.calls.result.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.result_gate {
            gate.notified().await;
        }
        let mut script = self.script();
        script.result_requests.push(assessment_id.to_owned());
        if take_failure(&mut script.fail_result) {
            return Err(network_failure());
        }
        if assessment_id != script.assessment_id {
            return Err(not_found("assessment"));
        }
        script.result.clone().ok_or_else(|| not_found("result"))
    }
}
