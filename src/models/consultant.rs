//! Veterinary consultants and consultation bookings.

use serde::{Deserialize, Serialize};

use super::{de_id, de_opt_id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultant {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default, alias = "phone")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Body of `POST /consultants/{id}/consultations`.
#[derive(Debug, Clone, Serialize)]
pub struct BookConsultation {
    pub message: String,
    /// Requested slot (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub consultant_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
}
