// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the marketplace backend.

pub mod consultant;
pub mod marketplace;
pub mod stats;
pub mod user;

pub use consultant::{BookConsultation, Consultant, Consultation};
pub use marketplace::{
    Article, ArticleInput, NewOrder, Order, OrderStatus, Product, ProductInput,
};
pub use stats::DashboardStats;
pub use user::{
    AuthResponse, LoginCredentials, PasswordResetRequest, ProfileUpdate, RegisterFields,
    ResetPassword, User, UserRole,
};

use serde::{Deserialize, Deserializer};

/// An image file attached to a create/update call (sent as multipart).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// List payload: the backend answers with a bare array or a `{data: [...]}` page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Paged { data: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Paged { data: items } => items,
        }
    }
}

/// Single-item payload: bare object or `{data: {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Item<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Item<T> {
    pub fn into_inner(self) -> T {
        match self {
            Item::Wrapped { data } | Item::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Ids arrive as JSON strings or numbers depending on the endpoint.
pub(crate) fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn de_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}
