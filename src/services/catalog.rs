//! Read-only catalog lookups: point reads and single-field equality
//! filters. Generic over the connection so the same lookups run inside
//! transactions. Composite views are assembled by the callers, one lookup
//! per referenced entity.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    entity::{
        items::{self, Column as ItemCol, Entity as Items},
        merchants::{self, Column as MerchantCol, Entity as Merchants},
        stocks::{self, Column as StockCol, Entity as Stocks},
        users::{self, Entity as Users},
    },
    error::{AppError, AppResult},
};

#[derive(Debug, Default)]
pub struct MerchantFilter {
    pub category: Option<String>,
    pub owner: Option<Uuid>,
}

#[derive(Debug)]
pub struct ItemFilter {
    pub merchant_id: Uuid,
    pub owner: Option<Uuid>,
}

pub async fn get_merchant<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<Option<merchants::Model>> {
    Ok(Merchants::find_by_id(id).one(conn).await?)
}

pub async fn get_item<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<items::Model>> {
    Ok(Items::find_by_id(id).one(conn).await?)
}

pub async fn get_stock<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
) -> AppResult<Option<stocks::Model>> {
    Ok(Stocks::find_by_id(item_id).one(conn).await?)
}

pub async fn get_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<users::Model>> {
    Ok(Users::find_by_id(id).one(conn).await?)
}

pub async fn list_merchants<C: ConnectionTrait>(
    conn: &C,
    filter: MerchantFilter,
) -> AppResult<Vec<merchants::Model>> {
    let mut finder = Merchants::find();
    if let Some(category) = filter.category {
        finder = finder.filter(MerchantCol::Category.eq(category));
    }
    if let Some(owner) = filter.owner {
        finder = finder.filter(MerchantCol::UserId.eq(owner));
    }
    Ok(finder.order_by_desc(MerchantCol::CreatedAt).all(conn).await?)
}

pub async fn list_items<C: ConnectionTrait>(
    conn: &C,
    filter: ItemFilter,
) -> AppResult<Vec<items::Model>> {
    let mut finder = Items::find().filter(ItemCol::MerchantId.eq(filter.merchant_id));
    if let Some(owner) = filter.owner {
        finder = finder.filter(ItemCol::UserId.eq(owner));
    }
    Ok(finder.order_by_desc(ItemCol::CreatedAt).all(conn).await?)
}

pub async fn list_stocks<C: ConnectionTrait>(
    conn: &C,
    merchant_id: Option<Uuid>,
) -> AppResult<Vec<stocks::Model>> {
    let mut finder = Stocks::find();
    if let Some(merchant_id) = merchant_id {
        finder = finder.filter(StockCol::MerchantId.eq(merchant_id));
    }
    Ok(finder.all(conn).await?)
}

/// Fetch a merchant and require it to belong to `actor`. Missing and
/// not-owned merchants are indistinguishable to the caller: both 403.
pub async fn require_owned_merchant<C: ConnectionTrait>(
    conn: &C,
    merchant_id: Uuid,
    actor: Uuid,
) -> AppResult<merchants::Model> {
    match get_merchant(conn, merchant_id).await? {
        Some(merchant) if merchant.user_id == actor => Ok(merchant),
        _ => Err(AppError::Forbidden(
            "Merchant tidak ditemukan atau bukan milik Anda".into(),
        )),
    }
}
