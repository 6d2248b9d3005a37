use thiserror::Error;

/// A fetched questionnaire does not have the shape the assessment flow relies on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("question {question_id} declares no scale values")]
    EmptyScale { question_id: String },
    #[error("question {question_id} has {labels} labels for {scale} scale values")]
    LabelMismatch {
        question_id: String,
        labels: usize,
        scale: usize,
    },
    #[error("question id {question_id} is used more than once")]
    DuplicateQuestion { question_id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown question: {question_id}")]
    UnknownQuestion { question_id: String },
    #[error("invalid answer value for {question_id}: {value}. allowed: {allowed:?}")]
    ValueOutOfScale {
        question_id: String,
        value: i32,
        allowed: Vec<i32>,
    },
    #[error("unanswered questions: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },
}
