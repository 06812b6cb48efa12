// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Agrovet client: session and API-access core for the poultry farmers'
//! marketplace and consultation app.
//!
//! This crate provides the authenticated session store, the configured HTTP
//! client that injects the bearer token into every request, and typed
//! facades for the backend resources (articles, products, orders,
//! consultants, statistics, password reset).

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod resources;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{ApiError, SessionError, StorageError};
pub use services::{ApiClient, SessionState, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SessionStorage};
