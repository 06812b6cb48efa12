//! Articles, products and orders.

use serde::{Deserialize, Serialize};

use super::{de_id, de_opt_id, ImageUpload};

/// Educational article published by a consultant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "body")]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields for creating or editing an article.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

/// Item sold by an agro-vet shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "stock")]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub shop_id: Option<String>,
}

/// Fields for creating or editing a product.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: u32,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Order placed by a farmer for a shop product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(deserialize_with = "de_id")]
    pub product_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "total_price")]
    pub total: Option<f64>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub product_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}
