//! Login, session extraction (Bearer header and cookie) and role gating.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, get_with_cookie, post_json, TEST_PASSWORD};
use sqlx::MySqlPool;
use vitrine_core::roles::{ROLE_ADMIN, ROLE_EDITOR};

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_token_and_sets_cookie(pool: MySqlPool) {
    let user = common::create_user(&pool, "alice", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "alice", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("admin_session="));
    assert!(cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["role"], "admin");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_401(pool: MySqlPool) {
    common::create_user(&pool, "alice", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "alice", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_user_is_401(pool: MySqlPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "nobody", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_accepts_bearer_token(pool: MySqlPool) {
    let token = common::token_for(&pool, "bob", ROLE_EDITOR).await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "bob");
    assert_eq!(json["data"]["role"], "editor");
    assert_eq!(json["data"]["email"], "bob@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_accepts_session_cookie(pool: MySqlPool) {
    let token = common::token_for(&pool, "bob", ROLE_EDITOR).await;
    let cookie = format!("theme=dark; admin_session={token}");
    let response = get_with_cookie(common::build_test_app(pool), "/api/v1/auth/me", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_require_a_session(pool: MySqlPool) {
    let response = get(common::build_test_app(pool.clone()), "/api/v1/admin/categories").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/categories",
        "not-a-jwt",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn editors_cannot_use_database_tools(pool: MySqlPool) {
    let token = common::token_for(&pool, "bob", ROLE_EDITOR).await;
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/database/tables",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}
