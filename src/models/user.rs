//! User identity and the payloads of the authentication endpoints.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{de_id, ImageUpload};

/// Role of an account; decides which area of the app the user lands in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Farmer,
    /// Veterinary consultant
    #[serde(alias = "vet", alias = "veterinarian")]
    Consultant,
    /// Agro-vet shop owner
    #[serde(alias = "agro_vet", alias = "agro-vet", alias = "shop")]
    Agrovet,
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Authenticated identity as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default, alias = "phone")]
    pub phone_number: Option<String>,
    #[serde(default, alias = "user_type")]
    pub role: UserRole,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
}

impl User {
    /// Name to show in headers and greetings.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        let full = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.phone_number.clone().unwrap_or_default()
        } else {
            full
        }
    }
}

/// Body of a successful `/login` or `/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(alias = "access_token")]
    pub token: String,
}

/// `/user` answers either with the bare user or wrapped in `{user}` / `{data}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: User },
    Data { data: User },
    Bare(User),
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Data { data: user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub phone_number: String,
    pub password: String,
}

/// Fields collected by the sign-up form.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_business_name"))]
pub struct RegisterFields {
    #[validate(length(min = 1, message = "First name is required"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub lastname: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    #[serde(rename = "user_type")]
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

fn validate_business_name(fields: &RegisterFields) -> Result<(), ValidationError> {
    let missing = fields
        .business_name
        .as_deref()
        .map_or(true, |n| n.trim().is_empty());
    if fields.role == UserRole::Agrovet && missing {
        return Err(ValidationError::new("business_name_required")
            .with_message(Cow::Borrowed("Business name is required for agro-vet shops")));
    }
    Ok(())
}

/// Profile fields the user may change. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// New profile picture; switches the request to multipart.
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

/// Body of `POST /request-password-reset`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
}

/// Body of `POST /reset-password`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ResetPassword {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Reset code is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}
