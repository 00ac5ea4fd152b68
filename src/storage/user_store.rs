// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SQLite-backed store for uploaded user records
//!
//! Every operation opens its own connection and drops it before returning,
//! so no handle outlives a request. Queries run on the Tokio blocking pool.
//! Inserts are not wrapped in a transaction: each row commits on its own.

use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::StorageError;

const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        age INTEGER,
        email TEXT
    )";

const INSERT_USER: &str = "INSERT INTO users (name, age, email) VALUES (?1, ?2, ?3)";

const SELECT_USERS: &str = "SELECT id, name, age, email FROM users ORDER BY id ASC";

/// Configuration for the user store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// How long a connection waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database.db"),
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// A record as received from an upload, before an id is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
}

/// A stored user row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
}

/// Handle to the `users` table
///
/// Cheap to clone: it only carries the configuration. Connections are opened
/// per call.
#[derive(Debug, Clone)]
pub struct UserStore {
    config: StoreConfig,
}

impl UserStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Path of the backing database file
    pub fn database_path(&self) -> &Path {
        &self.config.database_path
    }

    /// Creates the `users` table if it does not exist yet
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let conn = Connection::open(&config.database_path)?;
            conn.busy_timeout(config.busy_timeout)?;
            conn.execute(CREATE_USERS_TABLE, [])?;
            Ok::<_, StorageError>(())
        })
        .await??;

        info!(
            "User store ready at {}",
            self.config.database_path.display()
        );
        Ok(())
    }

    /// Inserts records in order and returns their assigned ids
    ///
    /// Each insert commits independently. If one fails, the rows inserted
    /// before it stay in the table and the error is returned.
    pub async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<i64>, StorageError> {
        let config = self.config.clone();

        let ids = tokio::task::spawn_blocking(move || {
            let conn = open_connection(&config)?;
            let mut stmt = conn.prepare(INSERT_USER)?;
            let mut ids = Vec::with_capacity(users.len());

            for user in &users {
                stmt.execute(params![user.name, user.age, user.email])?;
                ids.push(conn.last_insert_rowid());
            }

            Ok::<_, StorageError>(ids)
        })
        .await??;

        debug!("Inserted {} user records", ids.len());
        Ok(ids)
    }

    /// Returns every stored user ordered by id
    pub async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let config = self.config.clone();

        let users = tokio::task::spawn_blocking(move || {
            let conn = open_connection(&config)?;
            let mut stmt = conn.prepare(SELECT_USERS)?;
            let rows = stmt.query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    age: row.get(2)?,
                    email: row.get(3)?,
                })
            })?;

            let users = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, StorageError>(users)
        })
        .await??;

        Ok(users)
    }

    /// Number of stored users
    pub async fn count_users(&self) -> Result<usize, StorageError> {
        let config = self.config.clone();

        let count = tokio::task::spawn_blocking(move || {
            let conn = open_connection(&config)?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok::<_, StorageError>(count)
        })
        .await??;

        Ok(count.max(0) as usize)
    }
}

/// Opens an existing database; only `init_schema` creates the file
fn open_connection(config: &StoreConfig) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        &config.database_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(config.busy_timeout)?;
    Ok(conn)
}
