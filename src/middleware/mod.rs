// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request middleware for the API client.
//!
//! Each middleware is a pre-request / post-response hook pair run by
//! [`ApiClient`](crate::services::ApiClient) around every call.

pub mod auth;

pub use auth::BearerAuth;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::error::ApiError;

/// What a middleware knows about the call it is wrapping.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path relative to the base URL, e.g. `/login`
    pub path: String,
    /// Credential-less call (login, register, password reset).
    pub anonymous: bool,
    /// Bearer token attached to this request, recorded by [`BearerAuth`].
    pub credential: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, path: &str, anonymous: bool) -> Self {
        Self {
            method,
            path: path.to_string(),
            anonymous,
            credential: None,
        }
    }
}

#[async_trait]
pub trait Middleware: Send + Sync {
    /// Runs on the built request just before it is sent. May record what it
    /// attached in `ctx` for the matching `after_response`.
    async fn before_request(
        &self,
        _ctx: &mut RequestContext,
        _request: &mut reqwest::Request,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    /// Runs as soon as the response status is known, before the body is read.
    async fn after_response(
        &self,
        _ctx: &RequestContext,
        _status: StatusCode,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}
