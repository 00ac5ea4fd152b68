// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Parsing of uploaded JSON files for POST /upload-json
//!
//! The file holds either one object or an array of objects. Only `name`,
//! `age` and `email` are read; absent keys and JSON `null` become `None`,
//! every other key is ignored.

use crate::api::ApiError;
use crate::storage::NewUser;
use serde_json::{Map, Value};

/// A parsed upload, normalized to a list of records
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload {
    pub records: Vec<NewUser>,
}

impl UploadPayload {
    /// Parses the raw file bytes
    ///
    /// # Errors
    /// - `ApiError::MalformedJson` if the bytes are not valid JSON
    /// - `ApiError::ValidationError` if an item is not an object or a known
    ///   field has the wrong type
    ///
    /// Validation covers the whole file, so a rejected upload inserts nothing.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ApiError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedJson(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            single => vec![single],
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_record(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_record(index: usize, item: &Value) -> Result<NewUser, ApiError> {
    let object = item.as_object().ok_or_else(|| ApiError::ValidationError {
        field: format!("[{}]", index),
        message: format!("item {} must be a JSON object", index),
    })?;

    Ok(NewUser {
        name: optional_string(object, index, "name")?,
        age: optional_integer(object, index, "age")?,
        email: optional_string(object, index, "email")?,
    })
}

fn optional_string(
    object: &Map<String, Value>,
    index: usize,
    key: &str,
) -> Result<Option<String>, ApiError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(field_error(index, key, "must be a string")),
    }
}

fn optional_integer(
    object: &Map<String, Value>,
    index: usize,
    key: &str,
) -> Result<Option<i64>, ApiError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| field_error(index, key, "must be an integer")),
        Some(_) => Err(field_error(index, key, "must be an integer")),
    }
}

fn field_error(index: usize, key: &str, problem: &str) -> ApiError {
    ApiError::ValidationError {
        field: format!("[{}].{}", index, key),
        message: format!("{} {} (item {})", key, problem, index),
    }
}
