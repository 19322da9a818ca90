use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Order;

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantSummary {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BuyerSummary {
    pub name: String,
    pub email: String,
}

/// An order with merchant and buyer summaries attached, for the
/// platform-owner listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub merchant: MerchantSummary,
    pub user: BuyerSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OwnerOrderList {
    #[schema(value_type = Vec<OwnerOrderView>)]
    pub items: Vec<OwnerOrderView>,
}
