//! Public quote submission and the admin quote pipeline.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, put_json_auth};
use serde_json::json;
use sqlx::MySqlPool;
use vitrine_core::roles::ROLE_EDITOR;

fn valid_submission() -> serde_json::Value {
    json!({
        "name": "Dana Fischer",
        "email": "Dana@Example.com",
        "company": "Fischer GmbH",
        "message": "Please quote delivery to Hamburg.",
        "items": [
            { "product_id": null, "product_name": "Steel shelf 200cm", "quantity": 12 },
            { "product_name": "Wall bracket", "quantity": 40, "notes": "galvanized" }
        ]
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_email_is_rejected(pool: MySqlPool) {
    let mut body = valid_submission();
    body.as_object_mut().unwrap().remove("email");

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/quotes", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_requests")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_email_is_rejected(pool: MySqlPool) {
    let mut body = valid_submission();
    body["email"] = json!("not-an-email");

    let response = post_json(common::build_test_app(pool), "/api/v1/quotes", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_quantity_item_is_rejected(pool: MySqlPool) {
    let mut body = valid_submission();
    body["items"][0]["quantity"] = json!(0);

    let response = post_json(common::build_test_app(pool), "/api/v1/quotes", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn valid_submission_is_stored_with_items(pool: MySqlPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/quotes",
        valid_submission(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "new");
    assert_eq!(created["data"]["email"], "dana@example.com");

    let token = common::token_for(&pool, "sales", ROLE_EDITOR).await;
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_name"], "Steel shelf 200cm");
    assert_eq!(items[0]["quantity"], 12);
    assert_eq!(items[1]["notes"], "galvanized");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_changes_and_filtering(pool: MySqlPool) {
    let token = common::token_for(&pool, "sales", ROLE_EDITOR).await;
    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/quotes",
            valid_submission(),
        )
        .await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{}/status", ids[0]),
        json!({ "status": "quoted" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "quoted");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{}/status", ids[1]),
        json!({ "status": "archived" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/quotes?status=quoted",
        &token,
    )
    .await;
    let json = body_json(response).await;
    let listed = json["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], ids[0]);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/quotes/counts",
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["new"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn notes_and_delete(pool: MySqlPool) {
    let token = common::token_for(&pool, "sales", ROLE_EDITOR).await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/quotes",
        valid_submission(),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/notes"),
        json!({ "admin_notes": "  Called back on Monday  " }),
        &token,
    )
    .await;
    assert_eq!(
        body_json(response).await["data"]["admin_notes"],
        "Called back on Monday"
    );

    let uri = format!("/api/v1/admin/quotes/{id}");
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
