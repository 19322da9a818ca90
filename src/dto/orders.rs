use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::UploadedFile;
use crate::models::Order;

/// Assembled from the multipart form by the route handler; everything is
/// still raw text here and validated by the order workflow.
#[derive(Debug, Default)]
pub struct PlaceOrderInput {
    pub merchant_id: Option<String>,
    pub item_id: Option<String>,
    pub quantity: Option<String>,
    pub delivery_method: Option<String>,
    pub payment_method: Option<String>,
    pub address: Option<String>,
    pub payment_proof: Option<UploadedFile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantOrdersQuery {
    pub merchant_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
