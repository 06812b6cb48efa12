//! Product orders.

use reqwest::Method;
use serde_json::json;

use super::item_path;
use crate::error::ApiError;
use crate::models::{Item, Listing, NewOrder, Order, OrderStatus};
use crate::services::api::{ApiClient, RequestBody, RequestOptions};

pub struct OrdersResource<'a> {
    api: &'a ApiClient,
}

impl<'a> OrdersResource<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// GET /orders: the caller's orders (placed or received, by role).
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        let listing: Listing<Order> = self.api.get_json("/orders").await?;
        Ok(listing.into_vec())
    }

    /// GET /orders/{id}
    pub async fn get(&self, id: &str) -> Result<Order, ApiError> {
        let item: Item<Order> = self.api.get_json(&item_path("orders", id)).await?;
        Ok(item.into_inner())
    }

    /// POST /orders
    pub async fn place(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let item: Item<Order> = self
            .api
            .request_json(
                Method::POST,
                "/orders",
                RequestBody::json(order)?,
                RequestOptions::default(),
            )
            .await?;
        Ok(item.into_inner())
    }

    /// PATCH /orders/{id}/status
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        let path = format!("{}/status", item_path("orders", id));
        let item: Item<Order> = self
            .api
            .request_json(
                Method::PATCH,
                &path,
                RequestBody::Json(json!({ "status": status })),
                RequestOptions::default(),
            )
            .await?;
        Ok(item.into_inner())
    }

    /// DELETE /orders/{id}
    pub async fn cancel(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .request_empty(
                Method::DELETE,
                &item_path("orders", id),
                RequestBody::Empty,
                RequestOptions::default(),
            )
            .await
    }
}
