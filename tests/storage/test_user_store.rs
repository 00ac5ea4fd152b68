// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! UserStore tests against real SQLite files

use report_node::storage::{NewUser, StorageError, StoreConfig, User, UserStore};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> UserStore {
    UserStore::new(StoreConfig {
        database_path: dir.path().join("database.db"),
        ..Default::default()
    })
}

fn user(name: &str, age: i64, email: &str) -> NewUser {
    NewUser {
        name: Some(name.to_string()),
        age: Some(age),
        email: Some(email.to_string()),
    }
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.init_schema().await.unwrap();
    store
        .insert_users(vec![user("Alice", 30, "a@x.com")])
        .await
        .unwrap();
    store.init_schema().await.unwrap();

    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_rows_persist_across_store_instances() {
    let dir = TempDir::new().unwrap();

    let first = store_in(&dir);
    first.init_schema().await.unwrap();
    first
        .insert_users(vec![user("Alice", 30, "a@x.com")])
        .await
        .unwrap();
    drop(first);

    let second = store_in(&dir);
    second.init_schema().await.unwrap();
    let users = second.list_users().await.unwrap();

    assert_eq!(
        users,
        vec![User {
            id: 1,
            name: Some("Alice".to_string()),
            age: Some(30),
            email: Some("a@x.com".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_list_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.init_schema().await.unwrap();

    assert!(store.list_users().await.unwrap().is_empty());
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_null_fields_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.init_schema().await.unwrap();

    store.insert_users(vec![NewUser::default()]).await.unwrap();
    let users = store.list_users().await.unwrap();

    assert_eq!(users[0].name, None);
    assert_eq!(users[0].age, None);
    assert_eq!(users[0].email, None);
}

#[tokio::test]
async fn test_failed_insert_keeps_earlier_rows() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.init_schema().await.unwrap();

    let conn = rusqlite::Connection::open(dir.path().join("database.db")).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON users
         WHEN NEW.name = 'boom'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();
    drop(conn);

    let result = store
        .insert_users(vec![
            user("A", 1, "a@x.com"),
            user("B", 2, "b@x.com"),
            user("boom", 3, "c@x.com"),
            user("D", 4, "d@x.com"),
        ])
        .await;

    assert!(matches!(result, Err(StorageError::Sqlite(_))));
    let names: Vec<Option<String>> = store
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec![Some("A".to_string()), Some("B".to_string())]);
}

#[tokio::test]
async fn test_concurrent_inserts_assign_unique_ids() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.init_schema().await.unwrap();

    let mut handles = Vec::new();
    for batch in 0..4 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let users = (0..5)
                .map(|i| user(&format!("u{}-{}", batch, i), i, "x@x.com"))
                .collect();
            store.insert_users(users).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 20);
    assert!(users.windows(2).all(|w| w[0].id < w[1].id));
}
