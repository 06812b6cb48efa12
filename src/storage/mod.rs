// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted device storage for the session credential.
//!
//! The bearer token lives under one key and an optional cached user under
//! another. Only the session store writes them; the HTTP client reads the
//! token on every request.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::StorageError;
use crate::models::User;

/// Device-local key/value store. Each call is atomic; there is no partial-write
/// exposure, so callers need no locking of their own.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a key that does not exist succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// User snapshot kept for fast cold starts before revalidation completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedUser {
    pub user: User,
    pub saved_at: DateTime<Utc>,
}

/// Typed view over a [`KeyValueStore`] using the configured key names.
#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn KeyValueStore>,
    token_key: Arc<str>,
    user_key: Arc<str>,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            store,
            token_key: Arc::from(config.token_key.as_str()),
            user_key: Arc::from(config.user_key.as_str()),
        }
    }

    /// Durable storage in `config.storage_dir`.
    pub fn file(config: &Config) -> Self {
        Self::new(Arc::new(FileStore::new(&config.storage_dir)), config)
    }

    /// Ephemeral storage that lasts as long as the process.
    pub fn in_memory(config: &Config) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// Current bearer token, if any. An empty stored value counts as absent.
    pub async fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(&self.token_key)
            .await?
            .filter(|t| !t.trim().is_empty()))
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(&self.token_key, token).await
    }

    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.store.remove(&self.token_key).await
    }

    /// Cached user, if present and readable. Unreadable entries are dropped.
    pub async fn cached_user(&self) -> Result<Option<CachedUser>, StorageError> {
        let Some(raw) = self.store.get(&self.user_key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<CachedUser>(&raw) {
            Ok(cached) => Ok(Some(cached)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cached user");
                self.store.remove(&self.user_key).await?;
                Ok(None)
            }
        }
    }

    pub async fn set_cached_user(&self, user: &User) -> Result<(), StorageError> {
        let cached = CachedUser {
            user: user.clone(),
            saved_at: Utc::now(),
        };
        let raw = serde_json::to_string(&cached)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(&self.user_key, &raw).await
    }

    /// Remove both the token and the cached user.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let token = self.store.remove(&self.token_key).await;
        let user = self.store.remove(&self.user_key).await;
        token.and(user)
    }
}
