// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, http::Uri, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::server::AppState;
use super::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let version = crate::version::VERSION_NUMBER.to_string();
    let build = crate::version::VERSION.to_string();
    let features: Vec<String> = crate::version::FEATURES
        .iter()
        .map(|f| f.to_string())
        .collect();

    let response = match state.store.count_users().await {
        Ok(count) => HealthResponse {
            status: "healthy".to_string(),
            version,
            build,
            features,
            records: Some(count),
            issues: None,
        },
        Err(e) => {
            warn!("Health check could not read user store: {}", e);
            HealthResponse {
                status: "degraded".to_string(),
                version,
                build,
                features,
                records: None,
                issues: Some(vec![format!("User store unavailable: {}", e)]),
            }
        }
    };

    Json(response)
}

/// Fallback for unknown routes
pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
