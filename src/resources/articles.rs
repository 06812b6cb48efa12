//! Educational articles.

use reqwest::Method;

use super::{create_item, item_path, update_item};
use crate::error::ApiError;
use crate::models::{Article, ArticleInput, Item, Listing};
use crate::services::api::{ApiClient, RequestBody, RequestOptions};

pub struct ArticlesResource<'a> {
    api: &'a ApiClient,
}

impl<'a> ArticlesResource<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// GET /articles
    pub async fn list(&self) -> Result<Vec<Article>, ApiError> {
        let listing: Listing<Article> = self.api.get_json("/articles").await?;
        Ok(listing.into_vec())
    }

    /// GET /articles/{id}
    pub async fn get(&self, id: &str) -> Result<Article, ApiError> {
        let item: Item<Article> = self.api.get_json(&item_path("articles", id)).await?;
        Ok(item.into_inner())
    }

    /// POST /articles
    pub async fn create(&self, input: &ArticleInput) -> Result<Article, ApiError> {
        create_item(self.api, "/articles", input, "image", input.image.as_ref()).await
    }

    /// PUT /articles/{id}
    pub async fn update(&self, id: &str, input: &ArticleInput) -> Result<Article, ApiError> {
        update_item(
            self.api,
            &item_path("articles", id),
            input,
            "image",
            input.image.as_ref(),
        )
        .await
    }

    /// DELETE /articles/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .request_empty(
                Method::DELETE,
                &item_path("articles", id),
                RequestBody::Empty,
                RequestOptions::default(),
            )
            .await
    }
}
