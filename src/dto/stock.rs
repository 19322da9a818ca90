use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Item;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStockRequest {
    pub item_id: Option<Uuid>,
    pub merchant_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockListQuery {
    pub merchant_id: Option<Uuid>,
}

/// A stock row with its item attached (one lookup per entity, no join).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub item_id: Uuid,
    pub merchant_id: Uuid,
    pub quantity: i32,
    pub user_id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub item: Option<Item>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StockList {
    #[schema(value_type = Vec<StockView>)]
    pub items: Vec<StockView>,
}
