// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the report node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-json-ingest-clip-demo-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "json-upload",
    "multipart-upload",
    "user-listing",
    "sqlite-store",
    "clip-text-embedding",
    "clip-image-embedding",
    "mean-combined-embedding",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Report Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
