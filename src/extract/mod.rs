use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::{Form, Json, extract::Query};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use strum_macros::{Display, EnumString};
use validator::{Validate, ValidationErrors};

use crate::config::ErrorConfig;
use crate::exception::HttpError;

/// Where a rejected input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Location {
    Json,
    Query,
    Form,
}

/// Build the error response for a failed validation.
///
/// The detail is keyed by location, then by field:
/// `{"json": {"email": ["invalid email address"]}}`.
pub fn validation_error(location: Location, errors: &ValidationErrors) -> HttpError {
    let config = ErrorConfig::global();
    let mut fields = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                Value::String(message)
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(messages));
    }
    let detail = json!({ location.to_string(): fields });
    located_error(config, detail)
}

/// A malformed payload that never reached validation
fn rejection_error(location: Location, reason: String) -> HttpError {
    let config = ErrorConfig::global();
    let detail = json!({ location.to_string(): [reason] });
    located_error(config, detail)
}

fn located_error(config: &ErrorConfig, detail: Value) -> HttpError {
    // Config status codes are validated on load
    match HttpError::new(
        config.validation_error_status_code(),
        Some(config.validation_error_message()),
        None,
        None,
    ) {
        Ok(err) => err.with_detail(detail),
        Err(_) => HttpError::bad_request().with_detail(detail),
    }
}

/// JSON body extractor with validation
///
/// Deserializes like `axum::Json` and then runs the payload through its
/// `Validate` implementation. Both failure modes reject with the standard
/// JSON error body and a `json`-keyed detail.
///
/// # Example
/// ```no_run
/// use axum::{Json, Router, routing::post};
/// use parapet::ValidatedJson;
/// use serde::{Deserialize, Serialize};
/// use validator::Validate;
///
/// #[derive(Debug, Deserialize, Serialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateUser>) -> Json<CreateUser> {
///     Json(payload)
/// }
///
/// let app: Router = Router::new().route("/users", post(create));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| rejection_error(Location::Json, rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| validation_error(Location::Json, &errors))?;
        Ok(Self(value))
    }
}

/// Query string extractor with validation
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| rejection_error(Location::Query, rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| validation_error(Location::Query, &errors))?;
        Ok(Self(value))
    }
}

/// Urlencoded form extractor with validation
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| rejection_error(Location::Form, rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| validation_error(Location::Form, &errors))?;
        Ok(Self(value))
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Deref for ValidatedForm<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use axum::routing::get;
    use axum::Router;
    use serde::{Deserialize, Serialize};
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Serialize, Validate)]
    struct CreateUser {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Paging {
        #[validate(range(min = 1, max = 100))]
        per_page: u32,
    }

    fn app() -> Router {
        async fn create(ValidatedJson(payload): ValidatedJson<CreateUser>) -> Json<CreateUser> {
            Json(payload)
        }

        async fn list(ValidatedQuery(paging): ValidatedQuery<Paging>) -> String {
            paging.per_page.to_string()
        }

        Router::new().route("/users", get(list).post(create))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_passes_through() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "ferris", "email": "ferris@example.com"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["name"], "ferris");
    }

    #[tokio::test]
    async fn test_invalid_json_payload_is_rejected_with_field_detail() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "", "email": "not-an-email"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["status_code"], 400);
        assert_eq!(
            body["detail"]["json"]["name"][0],
            "name must not be empty"
        );
        assert!(body["detail"]["json"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["detail"]["json"].is_array());
    }

    #[tokio::test]
    async fn test_query_validation() {
        let ok = HttpRequest::builder()
            .uri("/users?per_page=10")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(ok).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let out_of_range = HttpRequest::builder()
            .uri("/users?per_page=1000")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(out_of_range).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["detail"]["query"]["per_page"].is_array());
    }

    #[test]
    fn test_location_display_is_lowercase() {
        assert_eq!(Location::Json.to_string(), "json");
        assert_eq!(Location::Query.to_string(), "query");
        assert_eq!(Location::Form.to_string(), "form");
    }
}
