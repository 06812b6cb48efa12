// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token middleware.
//!
//! Attaches the persisted token to outgoing requests and drops it when the
//! backend answers 401, so a rejected credential is never sent again.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;

use super::{Middleware, RequestContext};
use crate::error::ApiError;
use crate::storage::SessionStorage;

/// Callback fired after a 401 has cleared the stored credential. Receives the
/// rejected token.
pub type UnauthorizedHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
pub struct BearerAuth {
    storage: SessionStorage,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl BearerAuth {
    pub fn new(storage: SessionStorage) -> Self {
        Self {
            storage,
            on_unauthorized: None,
        }
    }

    /// Register a callback run after a 401 clears the stored token.
    pub fn on_unauthorized(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn before_request(
        &self,
        ctx: &mut RequestContext,
        request: &mut reqwest::Request,
    ) -> Result<(), ApiError> {
        if ctx.anonymous {
            return Ok(());
        }

        // Snapshot at call time; no waiting for a token to appear.
        let Some(token) = self.storage.token().await? else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ApiError::InvalidRequest("Stored token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        ctx.credential = Some(token);
        Ok(())
    }

    async fn after_response(
        &self,
        ctx: &RequestContext,
        status: StatusCode,
    ) -> Result<(), ApiError> {
        if status != StatusCode::UNAUTHORIZED || ctx.anonymous {
            return Ok(());
        }
        let Some(sent) = ctx.credential.as_deref() else {
            return Ok(());
        };

        // Only the credential this request carried is stale. A token stored
        // since then (a new login) stays.
        if self.storage.token().await?.as_deref() != Some(sent) {
            tracing::debug!(
                method = %ctx.method,
                path = %ctx.path,
                "401 for a credential that was already replaced"
            );
            return Ok(());
        }

        tracing::warn!(
            method = %ctx.method,
            path = %ctx.path,
            "Backend rejected stored credential (401), clearing it"
        );

        if let Err(e) = self.storage.clear().await {
            tracing::error!(error = %e, "Failed to clear stored credential after 401");
        }

        if let Some(hook) = &self.on_unauthorized {
            hook(sent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ctx(anonymous: bool) -> RequestContext {
        RequestContext::new(reqwest::Method::GET, "/user", anonymous)
    }

    fn request() -> reqwest::Request {
        reqwest::Request::new(
            reqwest::Method::GET,
            "http://localhost/api/user".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_attaches_token_when_present() {
        let storage = SessionStorage::in_memory(&Config::test_default());
        storage.set_token("tok_abc").await.unwrap();
        let auth = BearerAuth::new(storage);

        let mut req = request();
        let mut ctx = ctx(false);
        auth.before_request(&mut ctx, &mut req).await.unwrap();

        assert_eq!(req.headers()[AUTHORIZATION], "Bearer tok_abc");
        assert!(req.headers()[AUTHORIZATION].is_sensitive());
        assert_eq!(ctx.credential.as_deref(), Some("tok_abc"));
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let auth = BearerAuth::new(SessionStorage::in_memory(&Config::test_default()));

        let mut req = request();
        let mut ctx = ctx(false);
        auth.before_request(&mut ctx, &mut req).await.unwrap();

        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert_eq!(ctx.credential, None);
    }

    #[tokio::test]
    async fn test_anonymous_requests_skip_token() {
        let storage = SessionStorage::in_memory(&Config::test_default());
        storage.set_token("tok_abc").await.unwrap();
        let auth = BearerAuth::new(storage.clone());

        let mut req = request();
        let mut ctx = ctx(true);
        auth.before_request(&mut ctx, &mut req).await.unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());

        auth.after_response(&ctx, StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert_eq!(storage.token().await.unwrap().as_deref(), Some("tok_abc"));
    }

    fn sent_with(token: &str) -> RequestContext {
        let mut ctx = ctx(false);
        ctx.credential = Some(token.to_string());
        ctx
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token_and_fires_hook() {
        let storage = SessionStorage::in_memory(&Config::test_default());
        storage.set_token("tok_abc").await.unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let auth = BearerAuth::new(storage.clone()).on_unauthorized(move |rejected| {
            assert_eq!(rejected, "tok_abc");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        auth.after_response(&sent_with("tok_abc"), StatusCode::OK)
            .await
            .unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        auth.after_response(&sent_with("tok_abc"), StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert_eq!(storage.token().await.unwrap(), None);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_for_replaced_token_keeps_new_one() {
        let storage = SessionStorage::in_memory(&Config::test_default());
        storage.set_token("tok_new").await.unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let auth = BearerAuth::new(storage.clone()).on_unauthorized(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        auth.after_response(&sent_with("tok_old"), StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert_eq!(storage.token().await.unwrap().as_deref(), Some("tok_new"));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Nothing was attached, so nothing is stale
        auth.after_response(&ctx(false), StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert_eq!(storage.token().await.unwrap().as_deref(), Some("tok_new"));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
