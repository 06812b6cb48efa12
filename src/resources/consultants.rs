//! Veterinary consultants and bookings.

use reqwest::Method;

use super::item_path;
use crate::error::ApiError;
use crate::models::{BookConsultation, Consultant, Consultation, Item, Listing};
use crate::services::api::{ApiClient, RequestBody, RequestOptions};

pub struct ConsultantsResource<'a> {
    api: &'a ApiClient,
}

impl<'a> ConsultantsResource<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// GET /consultants
    pub async fn list(&self) -> Result<Vec<Consultant>, ApiError> {
        let listing: Listing<Consultant> = self.api.get_json("/consultants").await?;
        Ok(listing.into_vec())
    }

    /// GET /consultants/{id}
    pub async fn get(&self, id: &str) -> Result<Consultant, ApiError> {
        let item: Item<Consultant> = self
            .api
            .get_json(&item_path("consultants", id))
            .await?;
        Ok(item.into_inner())
    }

    /// POST /consultants/{id}/consultations
    pub async fn book(
        &self,
        consultant_id: &str,
        booking: &BookConsultation,
    ) -> Result<Consultation, ApiError> {
        let path = format!("{}/consultations", item_path("consultants", consultant_id));
        let item: Item<Consultation> = self
            .api
            .request_json(
                Method::POST,
                &path,
                RequestBody::json(booking)?,
                RequestOptions::default(),
            )
            .await?;
        Ok(item.into_inner())
    }

    /// GET /consultations: bookings made by (or assigned to) the caller.
    pub async fn my_consultations(&self) -> Result<Vec<Consultation>, ApiError> {
        let listing: Listing<Consultation> = self.api.get_json("/consultations").await?;
        Ok(listing.into_vec())
    }
}
