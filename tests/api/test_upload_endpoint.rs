// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /upload-json tests
//!
//! Cover the multipart contract, JSON normalization, null handling for
//! missing fields and the 400 paths that must leave the table untouched.

use super::helpers::*;
use axum::{body::Body, http::Request, http::StatusCode};
use report_node::api::ApiConfig;
use serde_json::json;

#[tokio::test]
async fn test_upload_array_inserts_every_record() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        upload_json(
            r#"[
                {"name":"Alice","age":30,"email":"a@x.com"},
                {"name":"Bob","age":25,"email":"b@x.com"},
                {"name":"Carol","age":41,"email":"c@x.com"}
            ]"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "3 records inserted successfully!"}));

    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_upload_single_object_inserts_one_record() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        upload_json(r#"{"name":"Alice","age":30,"email":"a@x.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "1 records inserted successfully!");
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_fields_are_stored_as_null() {
    let (app, _store, _dir) = setup_app().await;

    let (status, _) = send(&app, upload_json(r#"[{"name":"OnlyName"},{"age":52}]"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, users) = send(&app, get("/users")).await;
    assert_eq!(
        users,
        json!([
            {"id": 1, "name": "OnlyName", "age": null, "email": null},
            {"id": 2, "name": null, "age": 52, "email": null}
        ])
    );
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let (app, store, _dir) = setup_app().await;

    let (status, _) = send(
        &app,
        upload_json(r#"{"name":"Eve","age":22,"email":"e@x.com","role":"admin"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let users = store.list_users().await.unwrap();
    assert_eq!(users[0].name.as_deref(), Some("Eve"));
}

#[tokio::test]
async fn test_empty_array_inserts_nothing() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(&app, upload_json("[]")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "0 records inserted successfully!");
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_file_field_returns_400() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        upload_request(multipart_text_only("comment", "no file here")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No file uploaded"}));
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_file_under_other_field_name_returns_400() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        upload_request(multipart_body("upload", "users.json", br#"{"name":"x"}"#)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_non_multipart_request_returns_400() {
    let (app, store, _dir) = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/upload-json")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Alice"}"#))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_json_returns_400_and_inserts_nothing() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(&app, upload_json(r#"[{"name":"Alice","#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON:"));
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_non_object_item_names_index() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(&app, upload_json(r#"[{"name":"Alice"}, 42]"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "[1]");
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_wrongly_typed_field_rejects_whole_upload() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        upload_json(r#"[{"name":"A","age":1},{"name":"B","age":2},{"name":"C","age":"old"}]"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "[2].age");
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_oversized_file_returns_413() {
    let config = ApiConfig {
        max_upload_bytes: 32,
        ..Default::default()
    };
    let (app, store, _dir) = setup_app_with_config(config).await;

    let json = format!(r#"{{"name":"{}"}}"#, "x".repeat(100));
    let (status, body) = send(&app, upload_json(&json)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["details"]["max_bytes"], 32);
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_file_beyond_body_limit_returns_413() {
    let config = ApiConfig {
        max_upload_bytes: 32,
        ..Default::default()
    };
    let (app, store, _dir) = setup_app_with_config(config).await;

    // Larger than the router's body limit, not just the file limit
    let json = format!(r#"{{"name":"{}"}}"#, "x".repeat(200 * 1024));
    let (status, body) = send(&app, upload_json(&json)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "Upload exceeds 32 bytes");
    assert_eq!(body["details"]["max_bytes"], 32);
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_plain_form_value_named_file_is_not_a_file() {
    let (app, store, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        upload_request(multipart_text_only("file", r#"{"name":"Alice"}"#)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No file uploaded"}));
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_consecutive_uploads_keep_increasing_ids() {
    let (app, store, _dir) = setup_app().await;

    send(&app, upload_json(r#"[{"name":"A"},{"name":"B"}]"#)).await;
    send(&app, upload_json(r#"{"name":"C"}"#)).await;

    let ids: Vec<i64> = store
        .list_users()
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
