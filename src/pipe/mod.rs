use async_trait::async_trait;

use crate::config::ErrorConfig;
use crate::exception::HttpError;

pub mod builtins;

pub type PipeResult<T> = Result<T, PipeError>;

#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transformation failed: {0}")]
    Transformation(String),

    #[error("Internal pipe error: {0}")]
    Internal(String),
}

impl From<PipeError> for HttpError {
    fn from(err: PipeError) -> Self {
        match err {
            PipeError::Validation(message) | PipeError::Transformation(message) => {
                let config = ErrorConfig::global();
                match HttpError::new(config.validation_error_status_code(), Some(message), None, None)
                {
                    Ok(err) => err,
                    Err(_) => HttpError::bad_request(),
                }
            }
            PipeError::Internal(message) => {
                tracing::error!(%message, "pipe failed");
                HttpError::internal_server_error()
            }
        }
    }
}

/// The Pipe trait for transformation and validation
///
/// Pipes run an input through a transformation or a validity check before it
/// reaches business logic. A failed pipe converts into an [`HttpError`] with
/// the configured validation status code.
#[async_trait]
pub trait Pipe: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    async fn transform(&self, input: Self::Input) -> PipeResult<Self::Output>;
}
