// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod server;
pub mod upload;
pub mod users;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use server::{create_router, ApiConfig, ApiServer, AppState};
pub use upload::{upload_handler, UploadPayload, UploadResponse};
pub use users::users_handler;
