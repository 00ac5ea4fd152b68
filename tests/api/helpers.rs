// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared setup for the HTTP endpoint tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use report_node::api::{create_router, ApiConfig, AppState};
use report_node::storage::{StoreConfig, UserStore};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "----report-node-test-boundary";

/// Router over a fresh database in a temp dir
///
/// The `TempDir` must outlive the router.
pub async fn setup_app() -> (Router, UserStore, TempDir) {
    setup_app_with_config(ApiConfig::default()).await
}

pub async fn setup_app_with_config(config: ApiConfig) -> (Router, UserStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = UserStore::new(StoreConfig {
        database_path: dir.path().join("database.db"),
        ..Default::default()
    });
    store.init_schema().await.expect("Failed to create schema");

    let app = create_router(AppState::new(store.clone(), &config), &config);
    (app, store, dir)
}

/// Multipart body with a single file part
pub fn multipart_body(field_name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Multipart body with a plain text field and no file
pub fn multipart_text_only(field_name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"\r\n\r\n{v}\r\n--{b}--\r\n",
        b = BOUNDARY,
        n = field_name,
        v = value
    )
    .into_bytes()
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload-json")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn upload_json(json: &str) -> Request<Body> {
    upload_request(multipart_body("file", "users.json", json.as_bytes()))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request and decode the JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
