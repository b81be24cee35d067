use proc_macro::TokenStream;

mod error;

/// Derive macro mapping a domain error enum onto HTTP error responses
///
/// Each variant is annotated with the status code its occurrences should
/// surface as. The variant's `Display` output (usually supplied by
/// `thiserror`) becomes the error message, so the enum must implement
/// `Display`. Variants without an `#[api_error]` attribute default to 500.
///
/// Status codes outside the 4xx/5xx range are rejected at compile time.
///
/// # Example
/// ```ignore
/// use parapet::ApiError;
///
/// #[derive(Debug, thiserror::Error, ApiError)]
/// pub enum UserError {
///     #[error("user {0} not found")]
///     #[api_error(status = 404)]
///     NotFound(String),
///
///     #[error("email already registered")]
///     #[api_error(status = 409)]
///     EmailTaken,
/// }
/// ```
#[proc_macro_derive(ApiError, attributes(api_error))]
pub fn derive_api_error(input: TokenStream) -> TokenStream {
    error::derive_api_error(input)
}
