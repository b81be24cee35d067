use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};
use uuid::Uuid;

use crate::exception::{BoxError, ErrorFilter, HttpError, reason_phrase};

/// The standard JSON error body
///
/// Every error response carries this shape, whether it came from an
/// [`HttpError`], a validation rejection or an unhandled error deep in the
/// middleware stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    /// Structured detail, `{}` when the error carries none
    pub detail: Value,
    /// Simple description of the error
    pub message: String,
    /// The HTTP status code, repeated in the body
    pub status_code: u16,
}

/// Build the standard error body, applying the default substitutions.
///
/// A missing message becomes the status code's reason phrase, a missing
/// detail becomes an empty mapping.
pub fn error_body(status_code: u16, message: Option<String>, detail: Option<Value>) -> ErrorBody {
    ErrorBody {
        detail: detail.unwrap_or_else(|| json!({})),
        message: message.unwrap_or_else(|| reason_phrase(status_code).to_owned()),
        status_code,
    }
}

/// The default error filter: everything becomes a JSON error response
///
/// [`HttpError`] values render as-is. Anything else is an unhandled error;
/// the client gets a bare 500 with the standard body while the original
/// error is logged server-side under a generated error id.
#[derive(Default)]
pub struct JsonErrorFilter;

impl ErrorFilter for JsonErrorFilter {
    fn catch(&self, error: BoxError) -> Response {
        match error.downcast::<HttpError>() {
            Ok(err) => {
                if err.status().is_server_error() {
                    error!(status = err.status_code(), message = %err.message(), "request failed");
                } else {
                    debug!(status = err.status_code(), message = %err.message(), "request aborted");
                }
                err.into_response()
            }
            Err(other) => {
                let error_id = Uuid::new_v4();
                error!(%error_id, error = %other, "unhandled error");
                HttpError::internal_server_error().into_response()
            }
        }
    }
}

/// Glue for `axum::error_handling::HandleErrorLayer`.
///
/// ```no_run
/// use axum::Router;
/// use axum::error_handling::HandleErrorLayer;
/// use parapet::exception::handle_error;
///
/// let app: Router = Router::new().layer(HandleErrorLayer::new(handle_error));
/// ```
pub async fn handle_error(error: BoxError) -> Response {
    JsonErrorFilter.catch(error)
}
