#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::MySqlPool;
use tower::ServiceExt;

use vitrine_api::auth::jwt::JwtConfig;
use vitrine_api::auth::password::hash_password;
use vitrine_api::config::ServerConfig;
use vitrine_api::router::build_app_router;
use vitrine_api::state::AppState;
use vitrine_db::models::admin_user::{AdminUser, CreateAdminUser};
use vitrine_db::repositories::AdminUserRepo;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with a fixed JWT secret and a scratch backup
/// directory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        site_url: "http://localhost:8080".to_string(),
        backup_dir: std::env::temp_dir()
            .join(format!("vitrine-api-test-{}", uuid::Uuid::new_v4())),
        dump_page_size: 50,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: MySqlPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: MySqlPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

/// Insert an admin-panel user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &MySqlPool, username: &str, role: &str) -> AdminUser {
    let input = CreateAdminUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    AdminUserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Create a user and return a session token for them.
pub async fn token_for(pool: &MySqlPool, username: &str, role: &str) -> String {
    let user = create_user(pool, username, role).await;
    test_config()
        .jwt
        .issue(user.id, &user.username, &user.role)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// POST a raw text body (SQL scripts).
pub async fn post_text_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "text/plain")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse an NDJSON stream into one value per line.
pub async fn body_ndjson(response: Response<Body>) -> Vec<serde_json::Value> {
    body_text(response)
        .await
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
