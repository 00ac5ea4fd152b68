// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Upload API Module
//!
//! POST /upload-json: accepts a multipart JSON file and inserts its records.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::upload_handler;
pub use request::UploadPayload;
pub use response::UploadResponse;
