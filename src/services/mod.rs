// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - HTTP client wrapper and session store.

pub mod api;
pub mod session;

pub use api::{
    ApiClient, ApiClientBuilder, ApiResponse, MultipartBody, RequestBody, RequestOptions,
};
pub use session::{SessionState, SessionStore};
