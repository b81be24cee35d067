use async_trait::async_trait;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, Request};
use axum::body::Body;

use crate::exception::HttpError;

pub mod auth;
pub mod layer;

pub use auth::{BasicAuthGuard, BearerAuthGuard};
pub use layer::GuardLayer;

/// Standard Result type for Guard
/// Ok(()) means allowed
/// Err(GuardError) means denied
pub type GuardResult = Result<(), GuardError>;

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        /// `WWW-Authenticate` challenge to send with the 401
        challenge: Option<HeaderValue>,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl GuardError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            challenge: None,
        }
    }

    pub fn unauthorized_with_challenge(
        message: impl Into<String>,
        challenge: HeaderValue,
    ) -> Self {
        Self::Unauthorized {
            message: message.into(),
            challenge: Some(challenge),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

impl From<GuardError> for HttpError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Unauthorized { message, challenge } => {
                let err = HttpError::unauthorized().with_message(message);
                match challenge {
                    Some(value) => err.with_header(WWW_AUTHENTICATE, value),
                    None => err,
                }
            }
            GuardError::Forbidden(message) => HttpError::forbidden().with_message(message),
        }
    }
}

/// The Guard trait
/// Implement this to protect routes
#[async_trait]
pub trait Guard: Send + Sync + 'static {
    async fn can_activate(&self, request: &Request<Body>) -> GuardResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_401_with_challenge() {
        let denied = GuardError::unauthorized_with_challenge(
            "missing credentials",
            HeaderValue::from_static("Bearer"),
        );
        let err: HttpError = denied.into();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "missing credentials");
        assert_eq!(
            err.headers().unwrap().get(WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_forbidden_maps_to_403_without_headers() {
        let err: HttpError = GuardError::forbidden("admins only").into();
        assert_eq!(err.status_code(), 403);
        assert!(err.headers().is_none());
    }
}
