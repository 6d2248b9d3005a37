use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("answer to {question_id} is not a whole number: {raw:?}")]
    NotAnInteger { question_id: String, raw: String },
}
