// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the HTTP layer and the session layer.
//!
//! [`ApiError`] is what the HTTP client wrapper hands back: the raw backend
//! response or transport failure, untouched. [`SessionError`] is the
//! normalized, user-displayable form the session store exposes to the UI.

use serde_json::Value;

/// Shown when no response was received at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Shown after the backend rejects the stored credential.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Errors from the persisted key/value storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize stored value: {0}")]
    Serialization(String),
}

/// Errors produced by the HTTP client wrapper.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}")]
    Status { status: u16, body: Value },

    /// No response was received (connect failure, timeout, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The request could not be built (bad header value, bad MIME type, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Map a reqwest failure onto the wrapper's error type.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// HTTP status, if the backend responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Normalized error surfaced by the session store.
///
/// `Display` yields the message intended for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Rejected client-side before any network call.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the credentials or the token.
    #[error("{0}")]
    AuthRejected(String),

    /// No response was received.
    #[error("{0}")]
    NetworkUnavailable(String),

    /// Any other backend or decoding failure.
    #[error("{0}")]
    Server(String),
}

impl SessionError {
    pub fn message(&self) -> &str {
        match self {
            SessionError::Validation(m)
            | SessionError::AuthRejected(m)
            | SessionError::NetworkUnavailable(m)
            | SessionError::Server(m) => m,
        }
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => {
                let message = payload_message(status, &body);
                match status {
                    401 | 403 => SessionError::AuthRejected(message),
                    _ => SessionError::Server(message),
                }
            }
            ApiError::Network(_) => {
                SessionError::NetworkUnavailable(NETWORK_ERROR_MESSAGE.to_string())
            }
            ApiError::Decode(msg) => {
                SessionError::Server(format!("Unexpected response from server: {}", msg))
            }
            ApiError::Storage(e) => SessionError::Server(e.to_string()),
            ApiError::InvalidRequest(msg) => SessionError::Server(msg),
        }
    }
}

impl From<validator::ValidationErrors> for SessionError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .unwrap_or_else(|| "Invalid input".to_string());

        SessionError::Validation(message)
    }
}

/// Extract a human-readable message from a backend error payload.
///
/// Backends answer with `{message}`, `{error}`, Laravel-style
/// `{errors: {field: [..]}}`, a bare string, or nothing at all.
pub fn payload_message(status: u16, body: &Value) -> String {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(m) = non_empty(body.get("message")) {
        return m;
    }
    if let Some(m) = non_empty(body.get("error")) {
        return m;
    }

    match body.get("errors") {
        Some(Value::Object(map)) => {
            let first = map.values().find_map(|v| match v {
                Value::Array(items) => non_empty(items.first()),
                other => non_empty(Some(other)),
            });
            if let Some(m) = first {
                return m;
            }
        }
        Some(Value::Array(items)) => {
            if let Some(m) = non_empty(items.first()) {
                return m;
            }
        }
        _ => {}
    }

    if let Some(m) = non_empty(Some(body)) {
        return m;
    }

    format!("Request failed with status {}", status)
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
