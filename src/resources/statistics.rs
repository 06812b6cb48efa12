//! Dashboard statistics.

use crate::error::ApiError;
use crate::models::{DashboardStats, Item};
use crate::services::api::ApiClient;

pub struct StatisticsResource<'a> {
    api: &'a ApiClient,
}

impl<'a> StatisticsResource<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// GET /statistics
    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        let item: Item<DashboardStats> = self.api.get_json("/statistics").await?;
        Ok(item.into_inner())
    }
}
