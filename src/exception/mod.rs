use axum::Json;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::fmt;

use crate::error::{ParapetError, Result};

pub mod http;

pub use http::{ErrorBody, JsonErrorFilter, error_body, handle_error};

/// Fallback for valid status codes without an assigned reason phrase.
pub const UNKNOWN_REASON: &str = "Unknown Error";

/// A type-erased error as it travels through middleware
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Look up the standard reason phrase for a status code.
///
/// Codes the framework does not know fall back to [`UNKNOWN_REASON`].
pub fn reason_phrase(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or(UNKNOWN_REASON)
}

/// The error value that ends request handling with a JSON error response.
///
/// # Example
/// ```
/// use parapet::{HttpError, abort};
///
/// fn find(name: &str) -> Result<String, HttpError> {
///     if name == "foo" {
///         return abort(404, Some("This man is missing."));
///     }
///     Ok(format!("Hello, {name}!"))
/// }
///
/// assert_eq!(find("foo").unwrap_err().status_code(), 404);
/// ```
#[derive(Debug, Clone)]
pub struct HttpError {
    status: StatusCode,
    message: String,
    detail: Option<Value>,
    headers: Option<HeaderMap>,
}

impl HttpError {
    /// Create an error response value.
    ///
    /// # Arguments
    /// * `status_code` - The status code of the error (4xx and 5xx).
    /// * `message` - The simple description of the error. If not provided,
    ///   the reason phrase of the status code will be used.
    /// * `detail` - The detailed information of the error, use it to carry
    ///   custom error codes, documentation URLs, etc.
    /// * `headers` - Headers merged into the error response.
    ///
    /// Fails with [`ParapetError::UnrecognizedStatusCode`] when the code is
    /// not one the framework recognizes as an HTTP error code.
    pub fn new(
        status_code: u16,
        message: Option<String>,
        detail: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> Result<Self> {
        let status = Self::recognize(status_code)?;
        Ok(Self {
            status,
            message: message.unwrap_or_else(|| reason_phrase(status_code).to_owned()),
            detail,
            headers,
        })
    }

    /// Create an error response value from a typed status code.
    ///
    /// Still fails for codes outside the 4xx/5xx classes.
    pub fn from_status(status: StatusCode) -> Result<Self> {
        Self::new(status.as_u16(), None, None, None)
    }

    fn recognize(status_code: u16) -> Result<StatusCode> {
        let status = StatusCode::from_u16(status_code)
            .map_err(|_| ParapetError::UnrecognizedStatusCode { status_code })?;
        if !(status.is_client_error() || status.is_server_error()) {
            return Err(ParapetError::UnrecognizedStatusCode { status_code });
        }
        Ok(status)
    }

    /// Internal constructor for statuses known to be error codes.
    fn for_status(status: StatusCode) -> Self {
        Self {
            status,
            message: reason_phrase(status.as_u16()).to_owned(),
            detail: None,
            headers: None,
        }
    }

    pub fn bad_request() -> Self {
        Self::for_status(StatusCode::BAD_REQUEST)
    }

    pub fn unauthorized() -> Self {
        Self::for_status(StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden() -> Self {
        Self::for_status(StatusCode::FORBIDDEN)
    }

    pub fn not_found() -> Self {
        Self::for_status(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::for_status(StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn conflict() -> Self {
        Self::for_status(StatusCode::CONFLICT)
    }

    pub fn unprocessable_entity() -> Self {
        Self::for_status(StatusCode::UNPROCESSABLE_ENTITY)
    }

    pub fn too_many_requests() -> Self {
        Self::for_status(StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn internal_server_error() -> Self {
        Self::for_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn service_unavailable() -> Self {
        Self::for_status(StatusCode::SERVICE_UNAVAILABLE)
    }

    /// Replace the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a structured detail payload
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Add a header to the error response
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.get_or_insert_with(HeaderMap::new).insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

impl From<ParapetError> for HttpError {
    fn from(err: ParapetError) -> Self {
        tracing::error!(error = %err, "internal failure mapped to 500");
        Self::internal_server_error()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = error_body(status.as_u16(), Some(self.message), self.detail);
        match self.headers {
            None => (status, Json(body)).into_response(),
            Some(headers) => (status, headers, Json(body)).into_response(),
        }
    }
}

/// End request handling with an error response.
///
/// Similar to the framework's plain status rejections, but the response body
/// is the standard JSON error shape. Always returns `Err`, so handlers can
/// `return abort(...)` directly.
///
/// # Example
/// ```
/// use parapet::{HttpError, abort};
///
/// fn lookup(id: u64) -> Result<u64, HttpError> {
///     if id == 0 {
///         return abort(404, None);
///     }
///     Ok(id)
/// }
///
/// assert_eq!(lookup(0).unwrap_err().message(), "Not Found");
/// ```
///
/// # Panics
///
/// Passing a status code outside the recognized 4xx/5xx set is a programmer
/// error and panics. Use [`HttpError::new`] to handle the lookup failure.
pub fn abort<T>(status_code: u16, message: Option<&str>) -> std::result::Result<T, HttpError> {
    match HttpError::new(status_code, message.map(str::to_owned), None, None) {
        Ok(err) => Err(err),
        Err(err) => panic!("abort: {err}"),
    }
}

/// Filters turn errors raised during request processing into responses.
///
/// The default filter is [`JsonErrorFilter`]; applications override it to
/// reshape the error contract globally.
pub trait ErrorFilter: Send + Sync + 'static {
    /// Catch an error and render the final response
    fn catch(&self, error: BoxError) -> Response;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_codes_construct_with_reason_phrase() {
        for code in [400u16, 404, 409, 422, 500, 503] {
            let err = HttpError::new(code, None, None, None).unwrap();
            assert_eq!(err.status_code(), code);
            assert_eq!(err.message(), reason_phrase(code));
        }
    }

    #[test]
    fn test_unrecognized_codes_fail() {
        for code in [0u16, 99, 200, 302, 399, 600, 1000] {
            assert!(HttpError::new(code, None, None, None).is_err(), "{code}");
        }
    }

    #[test]
    fn test_explicit_message_wins() {
        let err = HttpError::new(404, Some("This man is missing.".to_owned()), None, None).unwrap();
        assert_eq!(err.message(), "This man is missing.");
    }

    #[test]
    fn test_unassigned_error_code_gets_fallback_reason() {
        let err = HttpError::new(599, None, None, None).unwrap();
        assert_eq!(err.message(), UNKNOWN_REASON);
    }

    #[test]
    fn test_builders() {
        let err = HttpError::not_found()
            .with_message("gone")
            .with_detail(json!({"doc": "https://example.com"}))
            .with_header(
                HeaderName::from_static("x-error-code"),
                HeaderValue::from_static("E404"),
            );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "gone");
        assert_eq!(err.detail().unwrap()["doc"], "https://example.com");
        assert_eq!(
            err.headers().unwrap().get("x-error-code").unwrap(),
            "E404"
        );
    }

    #[test]
    fn test_abort_always_errs() {
        let result: std::result::Result<(), HttpError> = abort(404, Some("missing"));
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "missing");
    }

    #[test]
    #[should_panic(expected = "abort")]
    fn test_abort_panics_on_unrecognized_code() {
        let _: std::result::Result<(), _> = abort(200, None);
    }

    #[test]
    fn test_display_includes_status_and_message() {
        let err = HttpError::not_found().with_message("no such user");
        assert_eq!(err.to_string(), "404 Not Found: no such user");
    }
}
