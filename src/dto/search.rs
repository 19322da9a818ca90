use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Item, Merchant};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
}

/// One sellable product: the stock row with its item and merchant attached.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub item_id: Uuid,
    pub merchant_id: Uuid,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
    pub item: Option<Item>,
    pub merchant: Option<Merchant>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SearchResultList {
    #[schema(value_type = Vec<SearchResult>)]
    pub items: Vec<SearchResult>,
}
