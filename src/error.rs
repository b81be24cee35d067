use axum::response::IntoResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParapetError>;

#[derive(Debug, Error)]
pub enum ParapetError {
    #[error("no error response for status code {status_code}, valid error status codes are 4xx and 5xx")]
    UnrecognizedStatusCode { status_code: u16 },

    #[error("invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for ParapetError {
    fn into_response(self) -> axum::response::Response {
        // Every variant is a programmer error surfaced server-side; clients
        // only ever see a plain 500 with the standard body.
        tracing::error!(error = %self, "internal failure while building a response");
        crate::exception::HttpError::internal_server_error().into_response()
    }
}
