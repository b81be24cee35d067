use dashmap::DashMap;
use std::env;
use std::sync::{Arc, OnceLock};

use axum::http::StatusCode;

use crate::error::{ParapetError, Result};

/// Env var overriding the status code used for validation failures
pub const VALIDATION_ERROR_STATUS_CODE: &str = "PARAPET_VALIDATION_ERROR_STATUS_CODE";
/// Env var overriding the message used for validation failures
pub const VALIDATION_ERROR_MESSAGE: &str = "PARAPET_VALIDATION_ERROR_MESSAGE";

const DEFAULT_VALIDATION_STATUS: u16 = 400;
const DEFAULT_VALIDATION_MESSAGE: &str = "Validation error";

static GLOBAL: OnceLock<ErrorConfig> = OnceLock::new();

/// Configuration for the error layer
///
/// A small env-seeded key/value store with typed accessors. Most
/// applications never touch it; the knobs exist so the validation error
/// contract can be tuned (e.g. 422 instead of 400) without forking the
/// extractors.
#[derive(Clone, Default)]
pub struct ErrorConfig {
    values: Arc<DashMap<String, String>>,
}

impl ErrorConfig {
    /// Load the configuration from the process environment.
    ///
    /// Fails when an override is present but invalid, e.g. a validation
    /// status code outside the recognized 4xx set.
    pub fn from_env() -> Result<Self> {
        let config = Self::default();
        for key in [VALIDATION_ERROR_STATUS_CODE, VALIDATION_ERROR_MESSAGE] {
            if let Ok(value) = env::var(key) {
                config.set(key, &value);
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Status code surfaced on validation failures (default 400)
    pub fn validation_error_status_code(&self) -> u16 {
        self.get(VALIDATION_ERROR_STATUS_CODE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_VALIDATION_STATUS)
    }

    /// Message surfaced on validation failures (default "Validation error")
    pub fn validation_error_message(&self) -> String {
        self.get(VALIDATION_ERROR_MESSAGE)
            .unwrap_or_else(|| DEFAULT_VALIDATION_MESSAGE.to_string())
    }

    fn validate(&self) -> Result<()> {
        if let Some(raw) = self.get(VALIDATION_ERROR_STATUS_CODE) {
            let invalid = |message: String| ParapetError::InvalidConfig {
                key: VALIDATION_ERROR_STATUS_CODE.to_string(),
                message,
            };
            let code: u16 = raw
                .parse()
                .map_err(|_| invalid(format!("{raw:?} is not a status code")))?;
            let status = StatusCode::from_u16(code)
                .map_err(|_| invalid(format!("{code} is not a status code")))?;
            if !status.is_client_error() {
                return Err(invalid(format!("{code} is not a 4xx status code")));
            }
        }
        Ok(())
    }

    /// Install this configuration as the process-wide one.
    ///
    /// Returns `false` when a configuration was already installed; the first
    /// install wins, matching `OnceLock` semantics.
    pub fn install(self) -> bool {
        GLOBAL.set(self).is_ok()
    }

    /// The process-wide configuration, loading from the environment on first
    /// use. An invalid environment degrades to the defaults with a warning
    /// rather than failing the request that happened to trigger the load.
    pub fn global() -> &'static ErrorConfig {
        GLOBAL.get_or_init(|| match Self::from_env() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "invalid error-layer configuration, using defaults");
                Self::default()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ErrorConfig::default();
        assert_eq!(config.validation_error_status_code(), 400);
        assert_eq!(config.validation_error_message(), "Validation error");
    }

    #[test]
    fn test_overrides() {
        let config = ErrorConfig::default();
        config.set(VALIDATION_ERROR_STATUS_CODE, "422");
        config.set(VALIDATION_ERROR_MESSAGE, "Unprocessable");
        assert_eq!(config.validation_error_status_code(), 422);
        assert_eq!(config.validation_error_message(), "Unprocessable");
    }

    #[test]
    fn test_validate_rejects_non_client_errors() {
        for raw in ["abc", "200", "500", "9999"] {
            let config = ErrorConfig::default();
            config.set(VALIDATION_ERROR_STATUS_CODE, raw);
            assert!(config.validate().is_err(), "{raw}");
        }
    }

    #[test]
    fn test_validate_accepts_4xx() {
        let config = ErrorConfig::default();
        config.set(VALIDATION_ERROR_STATUS_CODE, "422");
        assert!(config.validate().is_ok());
    }
}
