// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication and profile endpoints.

use reqwest::Method;

use super::update_item;
use crate::error::ApiError;
use crate::models::user::UserEnvelope;
use crate::models::{AuthResponse, LoginCredentials, ProfileUpdate, RegisterFields, User};
use crate::services::api::{ApiClient, RequestBody, RequestOptions};

pub struct AuthResource<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthResource<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// POST /login
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.api
            .request_json(
                Method::POST,
                "/login",
                RequestBody::json(credentials)?,
                RequestOptions::anonymous(),
            )
            .await
    }

    /// POST /register
    pub async fn register(&self, fields: &RegisterFields) -> Result<AuthResponse, ApiError> {
        self.api
            .request_json(
                Method::POST,
                "/register",
                RequestBody::json(fields)?,
                RequestOptions::anonymous(),
            )
            .await
    }

    /// POST /logout (invalidates the server-side session)
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api
            .request_empty(
                Method::POST,
                "/logout",
                RequestBody::Empty,
                RequestOptions::default(),
            )
            .await
    }

    /// GET /user: the user owning the current token.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.api.get_json("/user").await?;
        Ok(envelope.into_user())
    }

    /// PUT /profile, or multipart POST when a new picture is attached.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let envelope: UserEnvelope = update_item(
            self.api,
            "/profile",
            update,
            "profile_image",
            update.image.as_ref(),
        )
        .await?;
        Ok(envelope.into_user())
    }
}
