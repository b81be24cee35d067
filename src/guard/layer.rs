use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::exception::HttpError;
use crate::guard::Guard;

/// Tower Layer applying guards in front of a service
///
/// Guards run in registration order; the first denial short-circuits the
/// request and renders through the standard JSON error body.
#[derive(Clone)]
pub struct GuardLayer {
    guards: Arc<Vec<Arc<dyn Guard>>>,
}

impl GuardLayer {
    pub fn new(guards: Vec<Arc<dyn Guard>>) -> Self {
        Self {
            guards: Arc::new(guards),
        }
    }

    pub fn single(guard: impl Guard) -> Self {
        Self::new(vec![Arc::new(guard)])
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardService {
            inner,
            guards: Arc::clone(&self.guards),
        }
    }
}

#[derive(Clone)]
pub struct GuardService<S> {
    inner: S,
    guards: Arc<Vec<Arc<dyn Guard>>>,
}

impl<S> Service<Request<Body>> for GuardService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let guards = Arc::clone(&self.guards);
        // Take the service that was polled ready, leave the clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            for guard in guards.iter() {
                if let Err(denied) = guard.can_activate(&req).await {
                    return Ok(HttpError::from(denied).into_response());
                }
            }
            inner.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{GuardError, GuardResult};
    use async_trait::async_trait;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::Value;
    use tower::ServiceExt;

    struct HeaderKeyGuard;

    #[async_trait]
    impl Guard for HeaderKeyGuard {
        async fn can_activate(&self, request: &Request<Body>) -> GuardResult {
            match request.headers().get("x-api-key") {
                Some(value) if value == "sesame" => Ok(()),
                Some(_) => Err(GuardError::forbidden("wrong key")),
                None => Err(GuardError::unauthorized("missing key")),
            }
        }
    }

    fn app() -> Router {
        Router::new()
            .route("/secret", get(|| async { "ok" }))
            .layer(GuardLayer::single(HeaderKeyGuard))
    }

    #[tokio::test]
    async fn test_allowed_request_passes() {
        let request = Request::builder()
            .uri("/secret")
            .header("x-api-key", "sesame")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_denied_request_renders_json_error() {
        let request = Request::builder()
            .uri("/secret")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "missing key");
        assert_eq!(body["status_code"], 401);
    }

    #[tokio::test]
    async fn test_wrong_key_is_forbidden() {
        let request = Request::builder()
            .uri("/secret")
            .header("x-api-key", "open")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
