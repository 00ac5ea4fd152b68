// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// Response body for POST /upload-json
///
/// ```json
/// { "message": "2 records inserted successfully!" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub message: String,
}

impl UploadResponse {
    pub fn inserted(count: usize) -> Self {
        Self {
            message: format!("{} records inserted successfully!", count),
        }
    }
}
