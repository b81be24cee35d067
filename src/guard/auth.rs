use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, Request};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::guard::{Guard, GuardError, GuardResult};

type BasicVerifier = dyn Fn(&str, &str) -> bool + Send + Sync;
type TokenVerifier = dyn Fn(&str) -> bool + Send + Sync;

/// HTTP Basic authentication guard
///
/// Denials carry a `WWW-Authenticate: Basic realm="..."` challenge so
/// clients know how to retry.
///
/// # Example
/// ```
/// use parapet::guard::BasicAuthGuard;
///
/// let guard = BasicAuthGuard::new("api", |user, password| {
///     user == "admin" && password == "hunter2"
/// });
/// ```
pub struct BasicAuthGuard {
    realm: String,
    verify: Box<BasicVerifier>,
}

impl BasicAuthGuard {
    pub fn new<F>(realm: impl Into<String>, verify: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            realm: realm.into(),
            verify: Box::new(verify),
        }
    }

    fn challenge(&self, message: &str) -> GuardError {
        let value = HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
        GuardError::unauthorized_with_challenge(message, value)
    }
}

#[async_trait]
impl Guard for BasicAuthGuard {
    async fn can_activate(&self, request: &Request<Body>) -> GuardResult {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| self.challenge("missing credentials"))?;
        let encoded = header
            .strip_prefix("Basic ")
            .ok_or_else(|| self.challenge("expected Basic credentials"))?;
        let decoded = BASE64
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| self.challenge("malformed credentials"))?;
        let (user, password) = decoded
            .split_once(':')
            .ok_or_else(|| self.challenge("malformed credentials"))?;

        if (self.verify)(user, password) {
            Ok(())
        } else {
            Err(self.challenge("invalid credentials"))
        }
    }
}

/// Bearer token authentication guard
pub struct BearerAuthGuard {
    verify: Box<TokenVerifier>,
}

impl BearerAuthGuard {
    pub fn new<F>(verify: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            verify: Box::new(verify),
        }
    }

    fn challenge(&self, message: &str) -> GuardError {
        GuardError::unauthorized_with_challenge(message, HeaderValue::from_static("Bearer"))
    }
}

#[async_trait]
impl Guard for BearerAuthGuard {
    async fn can_activate(&self, request: &Request<Body>) -> GuardResult {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| self.challenge("missing token"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| self.challenge("expected Bearer token"))?;

        if (self.verify)(token.trim()) {
            Ok(())
        } else {
            Err(self.challenge("invalid token"))
        }
    }
}
