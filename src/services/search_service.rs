use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    dto::search::{SearchQuery, SearchResult, SearchResultList},
    entity::stocks::{Column as StockCol, Entity as Stocks},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::catalog::{self, MerchantFilter},
    state::AppState,
};

/// Product search over the stock ledger: optional merchant-category
/// narrowing, case-insensitive substring match on the item name, and
/// price sorting. Filtering happens in memory over the assembled views.
pub async fn search_products(
    state: &AppState,
    query: SearchQuery,
) -> AppResult<ApiResponse<SearchResultList>> {
    let stocks = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => {
            let merchants = catalog::list_merchants(
                &state.orm,
                MerchantFilter {
                    category: Some(category.to_string()),
                    owner: None,
                },
            )
            .await?;
            // No merchants in the category: an empty result, not an error.
            if merchants.is_empty() {
                return Ok(ApiResponse::success(
                    "OK",
                    SearchResultList { items: Vec::new() },
                    Some(Meta::total(0)),
                ));
            }
            let ids: Vec<Uuid> = merchants.iter().map(|m| m.id).collect();
            Stocks::find()
                .filter(StockCol::MerchantId.is_in(ids))
                .all(&state.orm)
                .await?
        }
        None => Stocks::find().all(&state.orm).await?,
    };

    let mut products = Vec::with_capacity(stocks.len());
    for stock in stocks {
        let item = catalog::get_item(&state.orm, stock.item_id).await?;
        let merchant = catalog::get_merchant(&state.orm, stock.merchant_id).await?;
        products.push(SearchResult {
            item_id: stock.item_id,
            merchant_id: stock.merchant_id,
            quantity: stock.quantity,
            updated_at: stock.updated_at.with_timezone(&chrono::Utc),
            item: item.map(Into::into),
            merchant: merchant.map(Into::into),
        });
    }

    if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
        let needle = name.to_lowercase();
        products.retain(|p| {
            p.item
                .as_ref()
                .is_some_and(|i| i.name.to_lowercase().contains(&needle))
        });
    }

    match query.sort_by.as_deref() {
        Some("termurah") => {
            products.sort_by_key(|p| p.item.as_ref().map_or(0, |i| i.base_price));
        }
        Some("termahal") => {
            products.sort_by_key(|p| std::cmp::Reverse(p.item.as_ref().map_or(0, |i| i.base_price)));
        }
        _ => {}
    }

    let total = products.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        SearchResultList { items: products },
        Some(Meta::total(total)),
    ))
}
