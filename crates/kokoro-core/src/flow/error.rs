use crate::collector::error::CollectError;
use crate::flow::Step;
use crate::flow::pipeline::{PipelineError, Stage};
use kokoro::error::Error;
use kokoro_model::error::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("expected step {expected}, flow is {actual}")]
    InvalidStep { expected: Step, actual: Step },

    #[error("another request is still in flight")]
    Busy,

    #[error("questionnaire {questionnaire_id} has no questions")]
    EmptyQuestionnaire { questionnaire_id: String },

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to load questionnaire data: {0}")]
    Fetch(#[source] Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn remote_message(err: &Error) -> &'static str {
    if err.is_unauthorized() {
        "Your session is no longer valid. Please log in again."
    } else if err.is_not_found() {
        "The assessment service does not know the requested item."
    } else {
        match err {
            Error::Json(_) | Error::Schema(_) => "The assessment service sent data this client cannot read.",
            Error::Http(_) | Error::Internal(_) | Error::Unauthenticated => {
                "Could not reach the assessment service. Check your connection and try again."
            }
        }
    }
}

impl FlowError {
    /// One line suitable for showing to the person taking the assessment.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidStep { .. } => "That action is not available right now.".to_owned(),
            Self::Busy => "Please wait for the current request to finish.".to_owned(),
            Self::EmptyQuestionnaire { .. } => "This questionnaire has no questions yet.".to_owned(),
            Self::Collect(_) => "Please enter one of the listed values.".to_owned(),
            Self::Validation(ValidationError::Incomplete { missing }) => {
                format!("Please answer every question before submitting ({} left).", missing.len())
            }
            Self::Validation(ValidationError::ValueOutOfScale { question_id, value, .. }) => {
                format!("{value} is not one of the offered answers for {question_id}.")
            }
            Self::Validation(ValidationError::UnknownQuestion { question_id }) => {
                format!("{question_id} is not part of this questionnaire.")
            }
            Self::Fetch(err) => remote_message(err).to_owned(),
            Self::Pipeline(PipelineError {
                stage: Stage::FetchResult,
                source,
                ..
            }) if !source.is_unauthorized() && !source.is_not_found() => {
                "Your answers were submitted, but the result could not be loaded. Retry to fetch it.".to_owned()
            }
            Self::Pipeline(err) => remote_message(&err.source).to_owned(),
        }
    }

    /// Whether repeating the same action may succeed without changing any input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Busy => true,
            Self::Fetch(err) => !err.is_unauthorized() && !err.is_not_found(),
            Self::Pipeline(err) => !err.source.is_unauthorized() && !err.source.is_not_found(),
            Self::InvalidStep { .. } | Self::EmptyQuestionnaire { .. } | Self::Collect(_) | Self::Validation(_) => {
                false
            }
        }
    }
}
