//! Medicine document model
//!
//! Field names and types follow the application's `Medicine` collection
//! schema, so the web API reads seeded documents without conversion.

use bson::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One document in the medicines collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDocument {
    pub name: String,
    pub price: f64,
    pub manufacturer: String,
    #[serde(rename = "type")]
    pub medicine_type: String,
    pub pack_size: String,
    pub composition: String,
    pub description: String,
    pub side_effects: Vec<String>,
    /// Always empty on seed; the application fills it in later.
    pub interactions: Document,
    pub is_discontinued: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}
