// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the SQLite user store

use thiserror::Error;

/// Errors raised by [`UserStore`](super::UserStore) operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite rejected a statement or could not open the database file
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking task running the query panicked or was cancelled
    #[error("Storage task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StorageError::TaskFailed(err.to_string())
    }
}
