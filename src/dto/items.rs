use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::UploadedFile;
use crate::models::Item;

#[derive(Debug, Default)]
pub struct CreateItemInput {
    pub merchant_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub base_price: Option<String>,
    pub quantity: Option<String>,
    pub photo: Option<UploadedFile>,
}

#[derive(Debug, Default)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub base_price: Option<String>,
    pub photo: Option<UploadedFile>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemListQuery {
    pub merchant_id: Option<uuid::Uuid>,
    pub owned: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemList {
    #[schema(value_type = Vec<Item>)]
    pub items: Vec<Item>,
}
