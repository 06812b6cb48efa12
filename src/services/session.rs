// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: the single source of truth for who is logged in.
//!
//! Handles:
//! - Login / registration and persisting the returned token
//! - Logout that always succeeds locally
//! - Restoring a session on app start from the persisted token
//! - Dropping the session when the backend rejects the token (401)
//!
//! State is published through a `watch` channel so UI code can re-render on
//! change. Errors are normalized into [`SessionError`] and mirrored in the
//! `error` field; raw transport errors never escape.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use validator::Validate;

use crate::config::Config;
use crate::error::{payload_message, ApiError, Result, SessionError, SESSION_EXPIRED_MESSAGE};
use crate::middleware::BearerAuth;
use crate::models::{
    AuthResponse, LoginCredentials, PasswordResetRequest, ProfileUpdate, RegisterFields,
    ResetPassword, User, UserRole,
};
use crate::services::api::ApiClient;
use crate::storage::SessionStorage;

/// Snapshot of the session.
///
/// `user` is set if and only if `token` is set. `error` is a transient field
/// alongside either state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub error: Option<String>,
    /// An operation is in flight.
    pub loading: bool,
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    fn sign_in(&mut self, user: User, token: String) {
        if self.token.as_deref() != Some(token.as_str()) || self.authenticated_at.is_none() {
            self.authenticated_at = Some(Utc::now());
        }
        self.user = Some(user);
        self.token = Some(token);
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.token = None;
        self.authenticated_at = None;
    }
}

/// Session store. Construct once at application start and share by reference.
pub struct SessionStore {
    api: ApiClient,
    storage: SessionStorage,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    /// Build the store together with the API client it drives.
    ///
    /// The client's bearer middleware is wired to drop the in-memory session
    /// whenever the backend rejects the stored token.
    pub fn new(config: &Config, storage: SessionStorage) -> std::result::Result<Self, ApiError> {
        let (sender, _) = watch::channel(SessionState::default());
        let state = Arc::new(sender);

        let hook_state = Arc::clone(&state);
        let auth = BearerAuth::new(storage.clone()).on_unauthorized(move |rejected| {
            hook_state.send_modify(|s| {
                if s.token.as_deref() == Some(rejected) {
                    tracing::info!("Session invalidated by backend");
                    s.sign_out();
                    s.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
                }
            });
        });

        let api = ApiClient::builder(config).middleware(auth).build()?;

        Ok(Self {
            api,
            storage,
            state,
        })
    }

    /// Client for the resource facades, sharing this store's credential.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ─── State Access ────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Role of the logged-in user, used to pick the role-specific area.
    pub fn role(&self) -> Option<UserRole> {
        self.state.borrow().user.as_ref().map(|u| u.role)
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Reset the `error` field without touching the session.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Authenticate with phone number (or other identifier) and password.
    ///
    /// On failure any previous session is left untouched.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(self.fail(SessionError::Validation(
                "Phone number and password are required".to_string(),
            )));
        }

        self.begin();
        let credentials = LoginCredentials {
            phone_number: identifier.to_string(),
            password: password.to_string(),
        };

        match self.api.auth().login(&credentials).await {
            Ok(auth) => self.establish(auth, "login").await,
            Err(e) => Err(self.fail(rejected_credentials(e))),
        }
    }

    /// Create an account and log into it.
    pub async fn register(&self, fields: RegisterFields) -> Result<User> {
        if let Err(errors) = fields.validate() {
            return Err(self.fail(errors.into()));
        }

        self.begin();
        match self.api.auth().register(&fields).await {
            Ok(auth) => self.establish(auth, "register").await,
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Leave the authenticated state.
    ///
    /// The backend is told best-effort; local state is cleared regardless of
    /// whether that call succeeds. Calling this twice is harmless.
    pub async fn logout(&self) {
        self.begin();

        let stored_token = match self.storage.token().await {
            Ok(t) => t.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token during logout");
                false
            }
        };
        let has_session = stored_token || self.state.borrow().token.is_some();
        let user_id = self.state.borrow().user.as_ref().map(|u| u.id.clone());

        if has_session {
            if let Err(e) = self.api.auth().logout().await {
                tracing::warn!(
                    error = %e,
                    "Backend logout failed, clearing local session anyway"
                );
            }
        }

        if let Err(e) = self.storage.clear().await {
            tracing::error!(error = %e, "Failed to clear stored session during logout");
        }

        self.state.send_modify(|s| {
            s.sign_out();
            s.error = None;
            s.loading = false;
        });

        if has_session {
            tracing::info!(user_id = user_id.as_deref().unwrap_or("-"), "Logged out");
        }
    }

    /// Restore the session from persisted storage (app start).
    ///
    /// Returns the revalidated user, or `None` when there is nothing to
    /// restore. A cached user is published right away so the UI can render
    /// before revalidation completes.
    pub async fn load_persisted_session(&self) -> Result<Option<User>> {
        self.begin();

        let token = match self.storage.token().await {
            Ok(t) => t,
            Err(e) => return Err(self.fail(ApiError::from(e).into())),
        };

        let Some(token) = token else {
            // A cached user without a token is stale.
            if let Err(e) = self.storage.clear().await {
                tracing::warn!(error = %e, "Failed to clear stale cached user");
            }
            self.state.send_modify(|s| {
                s.sign_out();
                s.loading = false;
            });
            return Ok(None);
        };

        let cached = match self.storage.cached_user().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached user");
                None
            }
        };

        if let Some(cached) = &cached {
            let (user, token) = (cached.user.clone(), token.clone());
            self.state.send_modify(|s| s.sign_in(user, token));
        }

        match self.api.auth().current_user().await {
            Ok(user) => {
                self.cache_user(&user).await;
                tracing::info!(user_id = %user.id, role = ?user.role, "Session restored");
                let published = user.clone();
                self.state.send_modify(|s| {
                    s.sign_in(published, token);
                    s.error = None;
                    s.loading = false;
                });
                Ok(Some(user))
            }
            Err(e) => {
                let err = expired_if_unauthorized(e);

                if let (SessionError::NetworkUnavailable(msg), Some(cached)) = (&err, cached) {
                    tracing::info!(
                        user_id = %cached.user.id,
                        "Backend unreachable, keeping cached session"
                    );
                    let msg = msg.clone();
                    self.state.send_modify(|s| {
                        s.error = Some(msg);
                        s.loading = false;
                    });
                    return Ok(Some(cached.user));
                }

                tracing::info!(error = %err, "Persisted session is no longer valid");
                if let Err(e) = self.storage.clear().await {
                    tracing::warn!(error = %e, "Failed to clear invalid session");
                }
                self.state.send_modify(|s| s.sign_out());
                Err(self.fail(err))
            }
        }
    }

    /// Update profile fields; the user is replaced with the backend's answer.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let current = self.state.borrow().token.clone();
        let Some(token) = current else {
            return Err(self.fail(not_logged_in()));
        };

        self.begin();
        match self.api.auth().update_profile(&update).await {
            Ok(user) => {
                // The session may have ended or changed while the call was in flight
                if !self.session_is(&token).await {
                    tracing::info!(user_id = %user.id, "Session ended during profile update");
                    return Err(self.fail(not_logged_in()));
                }

                self.cache_user(&user).await;
                let published = user.clone();
                self.state.send_modify(|s| {
                    if s.token.as_deref() == Some(token.as_str()) {
                        s.user = Some(published);
                    }
                    s.error = None;
                    s.loading = false;
                });
                Ok(user)
            }
            Err(e) => Err(self.fail(expired_if_unauthorized(e))),
        }
    }

    /// Ask the backend to send a reset code to `phone_number`.
    pub async fn request_password_reset(&self, phone_number: &str) -> Result<Option<String>> {
        let request = PasswordResetRequest {
            phone_number: phone_number.trim().to_string(),
        };
        if let Err(errors) = request.validate() {
            return Err(self.fail(errors.into()));
        }

        self.begin();
        match self.api.password().request_reset(&request).await {
            Ok(response) => {
                self.finish();
                Ok(response.message)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Consume a reset code and set a new password.
    pub async fn reset_password(&self, reset: ResetPassword) -> Result<Option<String>> {
        if let Err(errors) = reset.validate() {
            return Err(self.fail(errors.into()));
        }

        self.begin();
        match self.api.password().reset(&reset).await {
            Ok(response) => {
                self.finish();
                Ok(response.message)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    /// Persist and publish a freshly issued session.
    async fn establish(&self, auth: AuthResponse, via: &'static str) -> Result<User> {
        if let Err(e) = self.storage.set_token(&auth.token).await {
            tracing::error!(error = %e, "Failed to persist session token");
            return Err(self.fail(ApiError::from(e).into()));
        }
        self.cache_user(&auth.user).await;

        tracing::info!(
            user_id = %auth.user.id,
            role = ?auth.user.role,
            via,
            "Session established"
        );

        let user = auth.user.clone();
        self.state.send_modify(|s| {
            s.sign_in(auth.user, auth.token);
            s.error = None;
            s.loading = false;
        });
        Ok(user)
    }

    /// Whether `token` is still the live session, both in memory and on disk.
    async fn session_is(&self, token: &str) -> bool {
        if self.state.borrow().token.as_deref() != Some(token) {
            return false;
        }
        match self.storage.token().await {
            Ok(stored) => stored.as_deref() == Some(token),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                false
            }
        }
    }

    async fn cache_user(&self, user: &User) {
        if let Err(e) = self.storage.set_cached_user(user).await {
            tracing::warn!(error = %e, "Failed to cache user");
        }
    }

    fn begin(&self) {
        self.state.send_modify(|s| s.loading = true);
    }

    fn finish(&self) {
        self.state.send_modify(|s| {
            s.error = None;
            s.loading = false;
        });
    }

    fn fail(&self, err: SessionError) -> SessionError {
        tracing::debug!(error = %err, "Session operation failed");
        let message = err.message().to_string();
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.loading = false;
        });
        err
    }
}

fn not_logged_in() -> SessionError {
    SessionError::AuthRejected("You need to log in first".to_string())
}

/// Normalize a failed login. Any client error on the credential check
/// (bad password, unknown phone number, malformed input) is a rejection of
/// the credentials, not a server fault.
fn rejected_credentials(err: ApiError) -> SessionError {
    match err {
        ApiError::Status { status, body } if matches!(status, 400 | 401 | 403 | 404 | 422) => {
            SessionError::AuthRejected(payload_message(status, &body))
        }
        other => other.into(),
    }
}

/// Normalize an error from a call made with the stored token. A 401 there
/// means the session is over, whatever the backend's wording.
fn expired_if_unauthorized(err: ApiError) -> SessionError {
    if err.is_unauthorized() {
        SessionError::AuthRejected(SESSION_EXPIRED_MESSAGE.to_string())
    } else {
        err.into()
    }
}
