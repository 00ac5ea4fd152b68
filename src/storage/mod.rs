// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod user_store;

pub use errors::StorageError;
pub use user_store::{NewUser, StoreConfig, User, UserStore};
