use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::UploadedFile;
use crate::models::Merchant;

/// Assembled from the multipart form by the route handler.
#[derive(Debug, Default)]
pub struct CreateMerchantInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub norek: Option<String>,
    pub photo: Option<UploadedFile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MerchantListQuery {
    pub category: Option<String>,
    pub owned: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MerchantList {
    #[schema(value_type = Vec<Merchant>)]
    pub items: Vec<Merchant>,
}
