use crate::backend::AssessmentBackend;
use crate::collector::ResponseCollector;
use crate::flow::error::FlowError;
use crate::flow::pipeline::PipelineError;
use crate::flow::policy::SubmissionPolicy;
use kokoro_model::questionnaire::{Questionnaire, QuestionnaireSummary};
use kokoro_model::response::ResponseSet;
use kokoro_model::risk::RiskResult;
use kokoro_model::submission::AssessmentSubmission;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use strum::Display;
use tokio::sync::RwLock;

pub mod error;
pub mod pipeline;
pub mod policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
    Selecting,
    Answering,
    ViewingResults,
}

#[derive(Debug, Clone)]
pub struct Answering {
    pub questionnaire: Questionnaire,
    pub collector: ResponseCollector,
}

impl Answering {
    fn new(questionnaire: Questionnaire) -> Self {
        Self {
            questionnaire,
            collector: ResponseCollector::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Results {
    pub questionnaire: Questionnaire,
    pub responses: ResponseSet,
    pub assessment_id: String,
    pub result: RiskResult,
}

#[derive(Debug, Clone, Default)]
pub enum FlowState {
    #[default]
    Selecting,
    Answering(Answering),
    ViewingResults(Results),
}

impl FlowState {
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Selecting => Step::Selecting,
            Self::Answering(_) => Step::Answering,
            Self::ViewingResults(_) => Step::ViewingResults,
        }
    }
}

/// Held while a remote call is in flight. Dropping it clears the loading flag, whether the call
/// succeeded, failed, or its future was dropped half way.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, FlowError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FlowError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn expect_step(state: &FlowState, expected: Step) -> Result<(), FlowError> {
    let actual = state.step();
    if actual == expected {
        Ok(())
    } else {
        Err(FlowError::InvalidStep { expected, actual })
    }
}

fn submission_failed(err: PipelineError) -> FlowError {
    tracing::warn!(stage = %err.stage, err = %err.source, "Submission failed");
    err.into()
}

/// Drives one person through selecting a questionnaire, answering it and viewing the result.
///
/// All methods take `&self` so the controller can be shared with the task rendering it. Only one
/// remote call runs at a time; while it is in flight every state change is refused with
/// [`FlowError::Busy`]. Every check of the loading flag happens under the state lock.
pub struct FlowController<B> {
    backend: B,
    policy: SubmissionPolicy,
    state: RwLock<FlowState>,
    questionnaires: RwLock<Vec<QuestionnaireSummary>>,
    loading: AtomicBool,
    /// Id of an assessment the service created for the current answers whose result is outstanding.
    /// Written without an await point right after the submit stage, so it survives a dropped
    /// `submit` future.
    pending: Mutex<Option<String>>,
}

impl<B: AssessmentBackend> FlowController<B> {
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, SubmissionPolicy::default())
    }

    pub fn with_policy(backend: B, policy: SubmissionPolicy) -> Self {
        Self {
            backend,
            policy,
            state: RwLock::new(FlowState::Selecting),
            questionnaires: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
            pending: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn pending(&self) -> MutexGuard<'_, Option<String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn step(&self) -> Step {
        self.state.read().await.step()
    }

    pub async fn state(&self) -> FlowState {
        self.state.read().await.clone()
    }

    pub async fn questionnaires(&self) -> Vec<QuestionnaireSummary> {
        self.questionnaires.read().await.clone()
    }

    pub async fn questionnaire(&self) -> Option<Questionnaire> {
        match &*self.state.read().await {
            FlowState::Selecting => None,
            FlowState::Answering(answering) => Some(answering.questionnaire.clone()),
            FlowState::ViewingResults(results) => Some(results.questionnaire.clone()),
        }
    }

    pub async fn responses(&self) -> Option<ResponseSet> {
        match &*self.state.read().await {
            FlowState::Selecting => None,
            FlowState::Answering(answering) => Some(answering.collector.snapshot()),
            FlowState::ViewingResults(results) => Some(results.responses.clone()),
        }
    }

    pub async fn result(&self) -> Option<RiskResult> {
        match &*self.state.read().await {
            FlowState::ViewingResults(results) => Some(results.result.clone()),
            _ => None,
        }
    }

    /// Assessment id of a submission whose result is still outstanding.
    pub fn pending_assessment(&self) -> Option<String> {
        self.pending().clone()
    }

    pub async fn load_questionnaires(&self) -> Result<Vec<QuestionnaireSummary>, FlowError> {
        let state = self.state.read().await;
        expect_step(&state, Step::Selecting)?;
        let _guard = LoadingGuard::acquire(&self.loading)?;
        drop(state);

        let questionnaires = self.backend.list_questionnaires().await.map_err(|err| {
            tracing::warn!(%err, "Failed to load questionnaires");
            FlowError::Fetch(err)
        })?;
        tracing::debug!(count = questionnaires.len(), "Loaded questionnaires");
        self.questionnaires.write().await.clone_from(&questionnaires);
        Ok(questionnaires)
    }

    /// Fetches the questionnaire and starts answering it with an empty response set. On failure the
    /// flow stays in selection and the caller may simply select again.
    pub async fn select(&self, questionnaire_id: &str) -> Result<Questionnaire, FlowError> {
        let state = self.state.write().await;
        expect_step(&state, Step::Selecting)?;
        let _guard = LoadingGuard::acquire(&self.loading)?;
        drop(state);

        let questionnaire = self.backend.get_questionnaire(questionnaire_id).await.map_err(|err| {
            tracing::warn!(questionnaire_id, %err, "Failed to load questionnaire");
            FlowError::Fetch(err)
        })?;
        if !questionnaire.is_assessable() {
            tracing::warn!(questionnaire_id, "Questionnaire has no questions");
            return Err(FlowError::EmptyQuestionnaire {
                questionnaire_id: questionnaire.id,
            });
        }

        let mut state = self.state.write().await;
        *state = FlowState::Answering(Answering::new(questionnaire.clone()));
        *self.pending() = None;
        tracing::info!(questionnaire_id, questions = questionnaire.questions.len(), "Questionnaire selected");
        Ok(questionnaire)
    }

    pub async fn record(&self, question_id: &str, raw: &str) -> Result<i32, FlowError> {
        let mut state = self.state.write().await;
        if self.is_loading() {
            return Err(FlowError::Busy);
        }
        let actual = state.step();
        let FlowState::Answering(answering) = &mut *state else {
            return Err(FlowError::InvalidStep {
                expected: Step::Answering,
                actual,
            });
        };
        let value = answering.collector.record(question_id, raw)?;
        if let Some(assessment_id) = self.pending().take() {
            tracing::info!(assessment_id = %assessment_id, "Answers changed, a new assessment will be submitted");
        }
        Ok(value)
    }

    /// Submits the collected answers and fetches their result.
    ///
    /// The flow only moves on when both remote calls succeed. On failure the answers stay as they were
    /// and calling `submit` again retries; if the submission itself already went through only the
    /// result is fetched again.
    pub async fn submit(&self) -> Result<RiskResult, FlowError> {
        let state = self.state.write().await;
        let actual = state.step();
        let FlowState::Answering(answering) = &*state else {
            return Err(FlowError::InvalidStep {
                expected: Step::Answering,
                actual,
            });
        };
        let _guard = LoadingGuard::acquire(&self.loading)?;
        let submission = AssessmentSubmission {
            questionnaire_id: answering.questionnaire.id.clone(),
            responses: answering.collector.snapshot(),
        };
        if let Err(err) = self.policy.check(&answering.questionnaire, &submission.responses) {
            tracing::warn!(%err, "Submission rejected by policy");
            return Err(err.into());
        }
        let questionnaire = answering.questionnaire.clone();
        drop(state);

        let pending = self.pending().clone();
        let assessment_id = if let Some(assessment_id) = pending {
            tracing::debug!(assessment_id = %assessment_id, "Resuming at result fetch");
            assessment_id
        } else {
            let assessment_id = pipeline::submit(&self.backend, &submission)
                .await
                .map_err(submission_failed)?;
            *self.pending() = Some(assessment_id.clone());
            assessment_id
        };
        let result = pipeline::fetch_result(&self.backend, &assessment_id)
            .await
            .map_err(submission_failed)?;

        let mut state = self.state.write().await;
        *self.pending() = None;
        tracing::info!(
            assessment_id = %assessment_id,
            risk_level = %result.risk_level,
            risk_score = result.risk_score,
            "Assessment completed"
        );
        *state = FlowState::ViewingResults(Results {
            questionnaire,
            responses: submission.responses,
            assessment_id,
            result: result.clone(),
        });
        Ok(result)
    }

    /// Back to selection, dropping answers and results. Loaded questionnaire summaries are kept.
    pub async fn restart(&self) -> Result<(), FlowError> {
        let mut state = self.state.write().await;
        if self.is_loading() {
            return Err(FlowError::Busy);
        }
        tracing::debug!(from = %state.step(), "Restarting flow");
        *state = FlowState::Selecting;
        *self.pending() = None;
        Ok(())
    }
}
