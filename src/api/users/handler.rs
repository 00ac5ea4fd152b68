// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use crate::api::server::AppState;
use crate::api::ApiError;
use crate::storage::User;
use axum::{extract::State, Json};
use tracing::debug;

/// GET /users handler
///
/// Returns every row ordered by id ascending, `[]` when the table is empty.
///
/// ```json
/// [{ "id": 1, "name": "Alice", "age": 30, "email": "a@x.com" }]
/// ```
pub async fn users_handler(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store.list_users().await?;
    debug!("Listing {} users", users.len());
    Ok(Json(users))
}
