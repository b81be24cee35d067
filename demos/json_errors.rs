//! End-to-end tour: aborts, domain errors, validated input, guards and
//! pagination, all rendered through the standard JSON error body.
//!
//! Run with `cargo run --example json_errors`, then:
//!
//! ```text
//! curl http://127.0.0.1:3000/users/1
//! curl http://127.0.0.1:3000/users/7
//! curl -X POST http://127.0.0.1:3000/users -H 'content-type: application/json' -d '{"name":"","email":"nope"}'
//! curl http://127.0.0.1:3000/admin/stats -H 'authorization: Bearer secret-token'
//! ```

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use validator::Validate;

use parapet::guard::{BearerAuthGuard, GuardLayer};
use parapet::{ApiError, HttpError, Page, ValidatedJson, ValidatedQuery, abort};

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateUser {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    #[validate(email)]
    email: String,
}

#[derive(Debug, Deserialize, Validate)]
struct Paging {
    #[validate(range(min = 1))]
    page: u32,
    #[validate(range(min = 1, max = 100))]
    per_page: u32,
}

#[derive(Debug, thiserror::Error, ApiError)]
enum UserError {
    #[error("user {0} not found")]
    #[api_error(status = 404)]
    NotFound(u64),

    #[error("user storage unavailable")]
    Backend,
}

fn known_users() -> Vec<User> {
    (1..=3)
        .map(|id| User {
            id,
            name: format!("user-{id}"),
        })
        .collect()
}

async fn get_user(Path(id): Path<u64>) -> Result<Json<User>, UserError> {
    if id == 500 {
        // Simulated outage, surfaces as a 500 with the Display message
        return Err(UserError::Backend);
    }
    known_users()
        .into_iter()
        .find(|user| user.id == id)
        .map(Json)
        .ok_or(UserError::NotFound(id))
}

async fn delete_user(Path(id): Path<u64>) -> Result<Json<User>, HttpError> {
    if id != 1 {
        return abort(403, Some("only the first user may be deleted"));
    }
    abort(501, None)
}

async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> Json<User> {
    tracing::info!(email = %payload.email, "registering user");
    Json(User {
        id: 4,
        name: payload.name,
    })
}

async fn list_users(ValidatedQuery(paging): ValidatedQuery<Paging>) -> Page<User> {
    let users = known_users();
    let total = users.len() as u64;
    Page::new(users, paging.page, paging.per_page, total)
}

async fn admin_stats() -> Json<serde_json::Value> {
    Json(serde_json::json!({"users": 3}))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let admin = Router::new()
        .route("/stats", get(admin_stats))
        .layer(GuardLayer::single(BearerAuthGuard::new(|token| {
            token == "secret-token"
        })));

    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
