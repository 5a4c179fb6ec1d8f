use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {}: {message}", .status.as_u16())]
    Status { status: StatusCode, message: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("translation form is disabled until an API key is validated")]
    FormDisabled,

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("store error: {0}")]
    Store(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Store(format!("serialization error: {err}"))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
