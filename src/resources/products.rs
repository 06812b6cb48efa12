//! Agro-vet shop products.

use reqwest::Method;

use super::{create_item, item_path, update_item};
use crate::error::ApiError;
use crate::models::{Item, Listing, Product, ProductInput};
use crate::services::api::{ApiClient, RequestBody, RequestOptions};

pub struct ProductsResource<'a> {
    api: &'a ApiClient,
}

impl<'a> ProductsResource<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// GET /products, optionally filtered by a search term.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let mut options = RequestOptions::default();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            options = options.query("search", term);
        }

        let listing: Listing<Product> = self
            .api
            .request_json(Method::GET, "/products", RequestBody::Empty, options)
            .await?;
        Ok(listing.into_vec())
    }

    /// GET /products/{id}
    pub async fn get(&self, id: &str) -> Result<Product, ApiError> {
        let item: Item<Product> = self.api.get_json(&item_path("products", id)).await?;
        Ok(item.into_inner())
    }

    /// POST /products
    pub async fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        create_item(self.api, "/products", input, "image", input.image.as_ref()).await
    }

    /// PUT /products/{id}
    pub async fn update(&self, id: &str, input: &ProductInput) -> Result<Product, ApiError> {
        update_item(
            self.api,
            &item_path("products", id),
            input,
            "image",
            input.image.as_ref(),
        )
        .await
    }

    /// DELETE /products/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .request_empty(
                Method::DELETE,
                &item_path("products", id),
                RequestBody::Empty,
                RequestOptions::default(),
            )
            .await
    }
}
