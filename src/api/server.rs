// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers::{health_handler, not_found_handler};
use super::upload::upload_handler;
use super::users::users_handler;
use crate::storage::UserStore;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
    pub max_upload_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: UserStore,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: UserStore, config: &ApiConfig) -> Self {
        Self {
            store,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Builds the router for the ingestion service
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/upload-json", post(upload_handler))
        .route("/users", get(users_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(
            config
                .max_upload_bytes
                .saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// HTTP server for the ingestion service
///
/// `new` binds the listener and serves in a background task until
/// `shutdown` is called or the server is dropped.
pub struct ApiServer {
    config: ApiConfig,
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    pub async fn new(config: ApiConfig, store: UserStore) -> Result<Self> {
        let addr: SocketAddr = config.listen_addr.parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        let app = create_router(AppState::new(store, &config), &config);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let serve_future = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = serve_future.await {
                warn!("HTTP server stopped with error: {}", e);
            }
        });

        info!("API server listening on {}", actual_addr);

        Ok(Self {
            config,
            addr: actual_addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
