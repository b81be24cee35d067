//! # Parapet
//!
//! A thin extension over axum that standardizes how APIs fail.
//!
//! Parapet gives every error path the same JSON body, the way OpenAPI-first
//! frameworks do it: handlers abort with a status code, validation failures
//! surface per-field messages, and unhandled errors become an opaque 500 —
//! all rendered as `{"detail": ..., "message": ..., "status_code": ...}`.
//!
//! ## Features
//!
//! - **Standard error body**: one JSON shape for aborts, validation
//!   failures, guard denials and unhandled errors
//! - **Abort helper**: `abort(404, Some("This man is missing."))` from any
//!   handler returning `Result<_, HttpError>`
//! - **Validated extractors**: `ValidatedJson`, `ValidatedQuery` and
//!   `ValidatedForm` run payloads through their `Validate` implementation
//! - **Guards**: Basic/Bearer authentication as a tower layer, denials
//!   rendered through the standard body
//! - **Derive macro**: `#[derive(ApiError)]` maps domain error enums onto
//!   status codes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use parapet::{HttpError, abort};
//!
//! async fn hello(
//!     axum::extract::Path(name): axum::extract::Path<String>,
//! ) -> Result<String, HttpError> {
//!     if name == "foo" {
//!         return abort(404, Some("This man is missing."));
//!     }
//!     Ok(format!("Hello, {name}!"))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app: Router = Router::new().route("/{name}", get(hello));
//!
//!     // Serve your app...
//! }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod exception;
pub mod extract;
pub mod guard;
pub mod pipe;

// Re-export core types
pub use common::{Page, PageMeta};
pub use config::ErrorConfig;
pub use error::{ParapetError, Result};
pub use exception::{
    BoxError, ErrorBody, ErrorFilter, HttpError, JsonErrorFilter, abort, error_body, reason_phrase,
};
pub use extract::{Location, ValidatedForm, ValidatedJson, ValidatedQuery};

// Re-export macros
pub use parapet_macro::ApiError;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use parapet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ApiError;
    pub use crate::common::{Page, PageMeta};
    pub use crate::config::ErrorConfig;
    pub use crate::error::{ParapetError, Result};
    pub use crate::exception::{
        BoxError, ErrorBody, ErrorFilter, HttpError, JsonErrorFilter, abort, error_body,
        handle_error, reason_phrase,
    };
    pub use crate::extract::{
        Location, ValidatedForm, ValidatedJson, ValidatedQuery, validation_error,
    };
    pub use crate::guard::{
        BasicAuthGuard, BearerAuthGuard, Guard, GuardError, GuardLayer, GuardResult,
    };
    pub use crate::pipe::builtins::*;
    pub use crate::pipe::{Pipe, PipeError, PipeResult};
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
