use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub merchant_id: Option<Uuid>,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub item: String,
    pub count: i64,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of `total` over completed orders only.
    pub total_sales: i64,
    pub orders_by_status: BTreeMap<String, i64>,
    pub top_products: Vec<TopProduct>,
}
