#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::NaiveDate;
use coverage_api::auth::jwt::{generate_access_token, JwtConfig};
use coverage_api::config::ServerConfig;
use coverage_api::router::build_app_router;
use coverage_api::state::AppState;
use coverage_core::types::{business_today, DbId};
use coverage_db::models::collaborator::CreateCollaborator;
use coverage_db::models::day_worker::CreateDayWorker;
use coverage_db::models::post::CreatePost;
use coverage_db::repositories::{CollaboratorRepo, DayWorkerRepo, PostRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Business calendar offset used by every test.
pub const TEST_UTC_OFFSET_HOURS: i32 = -3;

/// Actor id embedded in the default test token.
pub const TEST_ACTOR: DbId = 77;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        business_utc_offset_hours: TEST_UTC_OFFSET_HOURS,
        jwt: JwtConfig {
            secret: "coverage-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, sharing the middleware stack with
/// `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// "Today" as the server under test sees it.
pub fn today() -> NaiveDate {
    business_today(TEST_UTC_OFFSET_HOURS)
}

/// `today() + days`, formatted for JSON bodies and query strings.
pub fn days_from_today(days: i64) -> String {
    (today() + chrono::Duration::days(days)).to_string()
}

/// `Authorization` header value for the given actor.
pub fn bearer(user_id: DbId) -> String {
    let token = generate_access_token(user_id, "supervisor", &test_config().jwt).unwrap();
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// GET as [`TEST_ACTOR`].
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", bearer(TEST_ACTOR))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET without credentials.
pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body as [`TEST_ACTOR`].
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_as(app, uri, body, TEST_ACTOR).await
}

/// POST a JSON body as the given actor.
pub async fn post_json_as(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    actor: DbId,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", bearer(actor))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with no body as [`TEST_ACTOR`].
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", bearer(TEST_ACTOR))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Directory fixtures
// ---------------------------------------------------------------------------

pub async fn seed_post(pool: &PgPool, code: &str, pattern: &str, planned: i32) -> DbId {
    PostRepo::create(
        pool,
        &CreatePost {
            unit_id: None,
            code: code.to_string(),
            name: format!("Post {code}"),
            function: Some("Guard".to_string()),
            schedule_pattern: pattern.to_string(),
            planned_headcount: planned,
            day_rate_cents: Some(18_000),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_collaborator(pool: &PgPool, post_id: Option<DbId>) -> DbId {
    CollaboratorRepo::create(
        pool,
        &CreateCollaborator {
            name: "Carla".to_string(),
            post_id,
            is_active: true,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_day_worker(pool: &PgPool) -> DbId {
    DayWorkerRepo::create(
        pool,
        &CreateDayWorker {
            name: "Davi".to_string(),
            is_active: true,
        },
    )
    .await
    .unwrap()
    .id
}

/// Mark (post, date) vacant through the API and return the vacancy mark id.
pub async fn mark_vacant(pool: &PgPool, post_id: DbId, date: &str, reason: &str) -> DbId {
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/posts/{post_id}/vacancies"),
        serde_json::json!({ "date": date, "reason": reason }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    sqlx::query_scalar("SELECT id FROM vacancy_marks WHERE post_id = $1 AND work_date = $2")
        .bind(post_id)
        .bind(date.parse::<NaiveDate>().unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
}
