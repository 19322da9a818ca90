use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    dto::dashboard::{DashboardQuery, DashboardSummary, TopProduct},
    entity::orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::OrderStatus,
    response::{ApiResponse, Meta},
    services::catalog,
    state::AppState,
};

pub async fn merchant_dashboard(
    state: &AppState,
    user: &AuthUser,
    query: DashboardQuery,
) -> AppResult<ApiResponse<DashboardSummary>> {
    let merchant_id = query
        .merchant_id
        .ok_or_else(|| AppError::Validation("merchantId wajib".into()))?;

    catalog::require_owned_merchant(&state.orm, merchant_id, user.user_id).await?;

    let orders = Orders::find()
        .filter(OrderCol::MerchantId.eq(merchant_id))
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        summarize(&orders),
        Some(Meta::empty()),
    ))
}

/// Fold a merchant's orders into the dashboard figures: completed revenue,
/// a status histogram, and the five most-ordered items by order count.
fn summarize(orders: &[OrderModel]) -> DashboardSummary {
    let total_sales = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed.as_str())
        .map(|o| o.total)
        .sum();

    let mut orders_by_status: BTreeMap<String, i64> = BTreeMap::new();
    for order in orders {
        *orders_by_status.entry(order.status.clone()).or_insert(0) += 1;
    }

    let mut per_item: BTreeMap<&str, TopProduct> = BTreeMap::new();
    for order in orders {
        let entry = per_item
            .entry(order.item_name.as_str())
            .or_insert_with(|| TopProduct {
                item: order.item_name.clone(),
                count: 0,
                total_quantity: 0,
            });
        entry.count += 1;
        entry.total_quantity += i64::from(order.quantity);
    }
    let mut top_products: Vec<TopProduct> = per_item.into_values().collect();
    top_products.sort_by(|a, b| b.count.cmp(&a.count));
    top_products.truncate(5);

    DashboardSummary {
        total_sales,
        orders_by_status,
        top_products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn order(item_name: &str, quantity: i32, total: i64, status: &str) -> OrderModel {
        OrderModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            merchant_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            item_name: item_name.to_string(),
            price: total / i64::from(quantity),
            quantity,
            total,
            delivery_method: "pickup".into(),
            payment_method: "cod".into(),
            payment_proof_url: None,
            status: status.into(),
            address: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn empty_orders_give_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_sales, 0);
        assert!(summary.orders_by_status.is_empty());
        assert!(summary.top_products.is_empty());
    }

    #[test]
    fn only_completed_orders_count_as_sales() {
        let orders = vec![
            order("Bayam", 2, 10000, "completed"),
            order("Bayam", 1, 5000, "pending"),
            order("Wortel", 3, 21000, "completed"),
            order("Wortel", 1, 7000, "canceled"),
        ];
        let summary = summarize(&orders);
        assert_eq!(summary.total_sales, 31000);
        assert_eq!(summary.orders_by_status.get("completed"), Some(&2));
        assert_eq!(summary.orders_by_status.get("pending"), Some(&1));
        assert_eq!(summary.orders_by_status.get("canceled"), Some(&1));
    }

    #[test]
    fn top_products_rank_by_order_count_and_cap_at_five() {
        let mut orders = Vec::new();
        for name in ["A", "B", "C", "D", "E", "F"] {
            orders.push(order(name, 1, 1000, "pending"));
        }
        orders.push(order("F", 4, 4000, "pending"));
        orders.push(order("F", 2, 2000, "pending"));

        let summary = summarize(&orders);
        assert_eq!(summary.top_products.len(), 5);
        assert_eq!(summary.top_products[0].item, "F");
        assert_eq!(summary.top_products[0].count, 3);
        assert_eq!(summary.top_products[0].total_quantity, 7);
    }
}
