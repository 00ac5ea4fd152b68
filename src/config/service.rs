// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the record ingestion service

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::ApiConfig;
use crate::storage::StoreConfig;

/// Combined configuration for the ingestion service binary
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub api: ApiConfig,
    /// SQLite store settings
    pub store: StoreConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let api_defaults = ApiConfig::default();
        let store_defaults = StoreConfig::default();

        Self {
            api: ApiConfig {
                listen_addr: env::var("LISTEN_ADDR").unwrap_or(api_defaults.listen_addr),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(api_defaults.max_upload_bytes),
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| parse_origins(&v))
                    .unwrap_or(api_defaults.cors_allowed_origins),
            },
            store: StoreConfig {
                database_path: env::var("DATABASE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(store_defaults.database_path),
                busy_timeout: env::var("DB_BUSY_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_millis)
                    .unwrap_or(store_defaults.busy_timeout),
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api.listen_addr.trim().is_empty() {
            return Err("Listen address cannot be empty".to_string());
        }
        if self.api.max_upload_bytes == 0 {
            return Err("Max upload size must be greater than 0".to_string());
        }
        if self.store.database_path.as_os_str().is_empty() {
            return Err("Database path cannot be empty".to_string());
        }
        Ok(())
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
