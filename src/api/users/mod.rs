// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /users: lists every stored record in insertion order.

pub mod handler;

pub use handler::users_handler;
