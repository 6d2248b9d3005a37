use http::StatusCode;
use kokoro_model::error::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Received invalid json data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Received invalid questionnaire: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Internal(#[from] InternalError),

    #[error("Not logged in")]
    Unauthenticated,
}

impl Error {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(HttpError::Transport(err)) => err.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// The request was rejected because the session is missing or expired.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated) || self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    #[error("Base url {0} cannot carry a path")]
    CannotBeABase(url::Url),

    #[error(transparent)]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    Transport(#[from] kokoro_http::Error),

    #[error(transparent)]
    Http(#[from] http::Error),
}
