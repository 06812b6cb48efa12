// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resource facades: thin named wrappers over [`ApiClient::request`].
//!
//! Each method has a fixed method/path and a typed payload. The only shaping
//! done here is choosing multipart when an image is attached.

pub mod articles;
pub mod auth;
pub mod consultants;
pub mod orders;
pub mod password;
pub mod products;
pub mod statistics;

pub use articles::ArticlesResource;
pub use auth::AuthResource;
pub use consultants::ConsultantsResource;
pub use orders::OrdersResource;
pub use password::{MessageResponse, PasswordResource};
pub use products::ProductsResource;
pub use statistics::StatisticsResource;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{ImageUpload, Item};
use crate::services::api::{ApiClient, RequestBody, RequestOptions};

impl ApiClient {
    pub fn auth(&self) -> AuthResource<'_> {
        AuthResource::new(self)
    }

    pub fn password(&self) -> PasswordResource<'_> {
        PasswordResource::new(self)
    }

    pub fn articles(&self) -> ArticlesResource<'_> {
        ArticlesResource::new(self)
    }

    pub fn products(&self) -> ProductsResource<'_> {
        ProductsResource::new(self)
    }

    pub fn orders(&self) -> OrdersResource<'_> {
        OrdersResource::new(self)
    }

    pub fn consultants(&self) -> ConsultantsResource<'_> {
        ConsultantsResource::new(self)
    }

    pub fn statistics(&self) -> StatisticsResource<'_> {
        StatisticsResource::new(self)
    }
}

/// `/{collection}/{id}` with the id percent-encoded.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("/{}/{}", collection, urlencoding::encode(id))
}

/// Create an item, sending multipart when an image is attached.
pub(crate) async fn create_item<T, P>(
    api: &ApiClient,
    path: &str,
    payload: &P,
    image_field: &str,
    image: Option<&ImageUpload>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
{
    let body = RequestBody::with_optional_image(payload, image_field, image)?;
    let item: Item<T> = api
        .request_json(Method::POST, path, body, RequestOptions::default())
        .await?;
    Ok(item.into_inner())
}

/// Update an item with PUT. Multipart bodies are sent as POST with
/// `_method=PUT` because the backend only parses files on POST.
pub(crate) async fn update_item<T, P>(
    api: &ApiClient,
    path: &str,
    payload: &P,
    image_field: &str,
    image: Option<&ImageUpload>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
{
    let (method, body) = match RequestBody::with_optional_image(payload, image_field, image)? {
        RequestBody::Multipart(multipart) => (
            Method::POST,
            RequestBody::Multipart(multipart.field("_method", "PUT")),
        ),
        body => (Method::PUT, body),
    };

    let item: Item<T> = api
        .request_json(method, path, body, RequestOptions::default())
        .await?;
    Ok(item.into_inner())
}
