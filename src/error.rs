// error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LampError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Device returned an empty response")]
    EmptyResponse,
    #[error("Malformed device response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
    #[error("Unsupported command for channel {0}")]
    UnsupportedCommand(&'static str),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No state polled yet")]
    NotPolled,
}

impl From<validator::ValidationErrors> for LampError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LampError::InvalidConfig(errors.to_string())
    }
}

impl IntoResponse for LampError {
    fn into_response(self) -> Response {
        let status = match &self {
            LampError::UnknownChannel(_) | LampError::NotPolled => StatusCode::NOT_FOUND,
            LampError::UnsupportedCommand(_) | LampError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            LampError::Transport(_) | LampError::EmptyResponse | LampError::Parse(_) => {
                StatusCode::BAD_GATEWAY
            }
            LampError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
