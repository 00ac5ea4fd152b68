// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /upload-json HTTP handler

use crate::api::server::AppState;
use crate::api::upload::{UploadPayload, UploadResponse};
use crate::api::ApiError;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{
    multipart::{MultipartError, MultipartRejection},
    Multipart,
};
use tracing::{info, warn};

/// Name of the multipart field carrying the JSON file
pub const FILE_FIELD: &str = "file";

/// POST /upload-json handler
///
/// Reads the `file` field of a multipart form, parses it as JSON and inserts
/// one row per record.
///
/// # Response Body
/// ```json
/// { "message": "2 records inserted successfully!" }
/// ```
///
/// # Errors
/// - 400 `{"error": "No file uploaded"}` when the request is not multipart or
///   has no `file` part with a filename
/// - 413 when the file exceeds `max_upload_bytes`
/// - 400 when the file is not valid JSON or an item is not an object
/// - 500 when the store rejects an insert (earlier rows stay committed)
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Upload rejected, not a multipart request: {}", rejection);
            return Err(ApiError::MissingFile);
        }
    };

    let bytes = read_file_field(&mut multipart, state.max_upload_bytes)
        .await?
        .ok_or(ApiError::MissingFile)?;

    let payload = UploadPayload::from_slice(&bytes)?;
    let ids = state.store.insert_users(payload.records).await?;

    info!("📥 Inserted {} records from uploaded file", ids.len());

    Ok(Json(UploadResponse::inserted(ids.len())))
}

/// Reads the first `file` part that carries a filename
///
/// Plain form values named `file` are skipped, as are parts with other names.
async fn read_file_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<Vec<u8>>, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ApiError::PayloadTooLarge(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Some(bytes));
    }

    Ok(None)
}

/// Body-limit failures surface as multipart errors with a 413 status
fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(max_bytes)
    } else {
        ApiError::InvalidRequest(err.body_text())
    }
}
