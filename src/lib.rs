// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod storage;
pub mod version;
pub mod vision;

pub use api::{create_router, ApiConfig, ApiError, ApiServer, AppState};
pub use config::ServiceConfig;
pub use embeddings::{ClipModel, ClipModelCache, MultimodalEmbedder};
pub use storage::{NewUser, StoreConfig, User, UserStore};
