use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{MerchantOrdersQuery, OrderList, PlaceOrderInput, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    entity::Stocks,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeliveryMethod, Order, OrderStatus, PaymentMethod},
    response::{ApiResponse, Meta},
    services::{catalog, stock_service},
    state::AppState,
};

/// The validated half of `PlaceOrderInput`, ready for the transaction.
#[derive(Debug)]
struct ValidOrder {
    merchant_id: Uuid,
    item_id: Uuid,
    quantity: i32,
    delivery_method: DeliveryMethod,
    payment_method: PaymentMethod,
    address: Option<String>,
}

/// Input validation happens before any stock or catalog read, each rule a
/// distinct failure, in this order: presence, quantity, methods, address,
/// payment proof.
fn validate_order_input(input: &PlaceOrderInput) -> Result<ValidOrder, AppError> {
    let (merchant_id, item_id, quantity, delivery_method, payment_method) = match (
        input.merchant_id.as_deref(),
        input.item_id.as_deref(),
        input.quantity.as_deref(),
        input.delivery_method.as_deref(),
        input.payment_method.as_deref(),
    ) {
        (Some(m), Some(i), Some(q), Some(d), Some(p))
            if !m.is_empty() && !i.is_empty() && !q.is_empty() && !d.is_empty() && !p.is_empty() =>
        {
            (m, i, q, d, p)
        }
        _ => return Err(AppError::Validation("Data pemesanan tidak lengkap".into())),
    };

    let quantity: i32 = match quantity.parse() {
        Ok(q) if q > 0 => q,
        _ => {
            return Err(AppError::Validation(
                "Quantity harus berupa angka positif".into(),
            ));
        }
    };

    let delivery_method = DeliveryMethod::parse(delivery_method).ok_or_else(|| {
        AppError::Validation("Metode pengiriman harus delivery atau pickup".into())
    })?;
    let payment_method = PaymentMethod::parse(payment_method)
        .ok_or_else(|| AppError::Validation("Metode pembayaran harus cod atau digital".into()))?;

    let address = input.address.clone().filter(|a| !a.is_empty());
    if delivery_method == DeliveryMethod::Delivery && address.is_none() {
        return Err(AppError::Validation(
            "Alamat wajib untuk pengiriman delivery".into(),
        ));
    }
    if payment_method == PaymentMethod::Digital && input.payment_proof.is_none() {
        return Err(AppError::Validation(
            "Bukti pembayaran wajib untuk metode digital".into(),
        ));
    }

    let merchant_id = Uuid::parse_str(merchant_id)
        .map_err(|_| AppError::Validation("merchantId tidak valid".into()))?;
    let item_id =
        Uuid::parse_str(item_id).map_err(|_| AppError::Validation("itemId tidak valid".into()))?;

    Ok(ValidOrder {
        merchant_id,
        item_id,
        quantity,
        delivery_method,
        payment_method,
        // Pickup orders never carry an address.
        address: match delivery_method {
            DeliveryMethod::Delivery => address,
            DeliveryMethod::Pickup => None,
        },
    })
}

/// Place an order: snapshot the item, create the order, and decrement the
/// stock as one unit of work. The stock row is locked for the duration of
/// the transaction, so two concurrent orders on the same item serialize
/// and the loser re-checks against the decremented quantity. Stock can
/// never be oversold.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    input: PlaceOrderInput,
) -> AppResult<ApiResponse<Order>> {
    let valid = validate_order_input(&input)?;

    let txn = state.orm.begin().await?;

    let stock = Stocks::find_by_id(valid.item_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Produk tidak ditemukan".into()))?;
    if stock.quantity < valid.quantity {
        return Err(AppError::Validation("Stok tidak cukup".into()));
    }

    let item = catalog::get_item(&txn, valid.item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item tidak ditemukan".into()))?;

    let total = i64::from(valid.quantity) * item.base_price;

    let payment_proof_url = match &input.payment_proof {
        Some(proof) => Some(
            state
                .images
                .upload(
                    &format!("pasarku/payment-proofs/{}", user.user_id),
                    &proof.bytes,
                    proof.content_type.as_deref(),
                )
                .await?,
        ),
        None => None,
    };

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        merchant_id: Set(valid.merchant_id),
        item_id: Set(valid.item_id),
        item_name: Set(item.name.clone()),
        price: Set(item.base_price),
        quantity: Set(valid.quantity),
        total: Set(total),
        delivery_method: Set(valid.delivery_method.as_str().to_string()),
        payment_method: Set(valid.payment_method.as_str().to_string()),
        payment_proof_url: Set(payment_proof_url),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        address: Set(valid.address),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    if !stock_service::decrement(&txn, valid.item_id, valid.quantity).await? {
        // Cannot happen while we hold the row lock, but the order must
        // never commit without its decrement.
        return Err(AppError::Validation("Stok tidak cukup".into()));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_place",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": total }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Pemesanan berhasil",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_my_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let items: Vec<Order> = orders.into_iter().map(Into::into).collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        OrderList { items },
        Some(Meta::total(total)),
    ))
}

pub async fn list_merchant_orders(
    state: &AppState,
    user: &AuthUser,
    query: MerchantOrdersQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let merchant_id = query
        .merchant_id
        .ok_or_else(|| AppError::Validation("merchantId wajib".into()))?;

    catalog::require_owned_merchant(&state.orm, merchant_id, user.user_id).await?;

    let orders = Orders::find()
        .filter(OrderCol::MerchantId.eq(merchant_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let items: Vec<Order> = orders.into_iter().map(Into::into).collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        OrderList { items },
        Some(Meta::total(total)),
    ))
}

/// Merchant path of the status machine: the caller must own the merchant
/// the order was placed with.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let next = parse_status(payload.status.as_deref())?;

    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Pesanan tidak ditemukan".into()))?;

    let merchant = catalog::get_merchant(&state.orm, order.merchant_id).await?;
    if !merchant.is_some_and(|m| m.user_id == user.user_id) {
        return Err(AppError::Forbidden(
            "Anda tidak memiliki akses untuk mengupdate pesanan ini".into(),
        ));
    }

    let order = apply_status(&state.orm, order, next).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Status pesanan diperbarui",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub(crate) fn parse_status(status: Option<&str>) -> Result<OrderStatus, AppError> {
    status.and_then(OrderStatus::parse).ok_or_else(|| {
        AppError::Validation(
            "Status tidak valid. Gunakan: pending, shipped, completed, canceled".into(),
        )
    })
}

/// Validate the transition against the state graph and persist it.
pub(crate) async fn apply_status<C: ConnectionTrait>(
    conn: &C,
    order: crate::entity::orders::Model,
    next: OrderStatus,
) -> AppResult<crate::entity::orders::Model> {
    let current = OrderStatus::parse(&order.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "order {} carries unknown status {:?}",
            order.id,
            order.status
        ))
    })?;

    if !current.can_transition_to(next) {
        return Err(AppError::InvalidStatusTransition {
            from: current,
            to: next,
        });
    }

    let mut active: OrderActive = order.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> PlaceOrderInput {
        PlaceOrderInput {
            merchant_id: Some(Uuid::new_v4().to_string()),
            item_id: Some(Uuid::new_v4().to_string()),
            quantity: Some("2".into()),
            delivery_method: Some("pickup".into()),
            payment_method: Some("cod".into()),
            address: None,
            payment_proof: None,
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_fail_first() {
        let input = PlaceOrderInput {
            quantity: None,
            ..base_input()
        };
        let err = validate_order_input(&input).unwrap_err();
        assert_eq!(message(err), "Data pemesanan tidak lengkap");
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        for qty in ["0", "-3", "abc"] {
            let input = PlaceOrderInput {
                quantity: Some(qty.into()),
                ..base_input()
            };
            let err = validate_order_input(&input).unwrap_err();
            assert_eq!(message(err), "Quantity harus berupa angka positif");
        }
    }

    #[test]
    fn unknown_methods_are_rejected() {
        let input = PlaceOrderInput {
            delivery_method: Some("drone".into()),
            ..base_input()
        };
        let err = validate_order_input(&input).unwrap_err();
        assert_eq!(message(err), "Metode pengiriman harus delivery atau pickup");

        let input = PlaceOrderInput {
            payment_method: Some("wire".into()),
            ..base_input()
        };
        let err = validate_order_input(&input).unwrap_err();
        assert_eq!(message(err), "Metode pembayaran harus cod atau digital");
    }

    #[test]
    fn delivery_requires_address() {
        let input = PlaceOrderInput {
            delivery_method: Some("delivery".into()),
            address: None,
            ..base_input()
        };
        let err = validate_order_input(&input).unwrap_err();
        assert_eq!(message(err), "Alamat wajib untuk pengiriman delivery");
    }

    #[test]
    fn digital_requires_payment_proof() {
        let input = PlaceOrderInput {
            payment_method: Some("digital".into()),
            payment_proof: None,
            ..base_input()
        };
        let err = validate_order_input(&input).unwrap_err();
        assert_eq!(message(err), "Bukti pembayaran wajib untuk metode digital");
    }

    #[test]
    fn pickup_order_drops_address() {
        let input = PlaceOrderInput {
            address: Some("Jl. Kenanga 12".into()),
            ..base_input()
        };
        let valid = validate_order_input(&input).unwrap();
        assert_eq!(valid.address, None);
        assert_eq!(valid.quantity, 2);
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!(parse_status(Some("paid")).is_err());
        assert!(parse_status(None).is_err());
        assert_eq!(parse_status(Some("shipped")).unwrap(), OrderStatus::Shipped);
    }
}
