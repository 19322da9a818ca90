use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lng: f64,
    pub photo_url: String,
    pub norek: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub name: String,
    pub category: String,
    pub base_price: i64,
    pub photo_url: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-to-one quantity ledger for an item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub item_id: Uuid,
    pub merchant_id: Uuid,
    pub quantity: i32,
    pub user_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub merchant_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `item_name` and `price` are snapshots taken at placement; later item
/// edits never change an existing order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub merchant_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub total: i64,
    pub delivery_method: String,
    pub payment_method: String,
    pub payment_proof_url: Option<String>,
    pub status: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub merchant_id: Uuid,
    #[serde(rename = "message")]
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "shipped" => Some(OrderStatus::Shipped),
            "completed" => Some(OrderStatus::Completed),
            "canceled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Transition table: pending -> {shipped, canceled},
    /// shipped -> {completed, canceled}; completed and canceled are terminal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Shipped) | (Pending, Canceled) | (Shipped, Completed) | (Shipped, Canceled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<crate::entity::merchants::Model> for Merchant {
    fn from(model: crate::entity::merchants::Model) -> Self {
        Merchant {
            id: model.id,
            name: model.name,
            category: model.category,
            lat: model.lat,
            lng: model.lng,
            photo_url: model.photo_url,
            norek: model.norek,
            user_id: model.user_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::items::Model> for Item {
    fn from(model: crate::entity::items::Model) -> Self {
        Item {
            id: model.id,
            merchant_id: model.merchant_id,
            name: model.name,
            category: model.category,
            base_price: model.base_price,
            photo_url: model.photo_url,
            user_id: model.user_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::stocks::Model> for Stock {
    fn from(model: crate::entity::stocks::Model) -> Self {
        Stock {
            item_id: model.item_id,
            merchant_id: model.merchant_id,
            quantity: model.quantity,
            user_id: model.user_id,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::carts::Model> for CartEntry {
    fn from(model: crate::entity::carts::Model) -> Self {
        CartEntry {
            id: model.id,
            user_id: model.user_id,
            merchant_id: model.merchant_id,
            item_id: model.item_id,
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::orders::Model> for Order {
    fn from(model: crate::entity::orders::Model) -> Self {
        Order {
            id: model.id,
            user_id: model.user_id,
            merchant_id: model.merchant_id,
            item_id: model.item_id,
            item_name: model.item_name,
            price: model.price,
            quantity: model.quantity,
            total: model.total,
            delivery_method: model.delivery_method,
            payment_method: model.payment_method,
            payment_proof_url: model.payment_proof_url,
            status: model.status,
            address: model.address,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::messages::Model> for Message {
    fn from(model: crate::entity::messages::Model) -> Self {
        Message {
            id: model.id,
            user_id: model.user_id,
            merchant_id: model.merchant_id,
            body: model.body,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

impl DeliveryMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "delivery" => Some(DeliveryMethod::Delivery),
            "pickup" => Some(DeliveryMethod::Pickup),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryMethod::Delivery => "delivery",
            DeliveryMethod::Pickup => "pickup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cod,
    Digital,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cod" => Some(PaymentMethod::Cod),
            "digital" => Some(PaymentMethod::Digital),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Digital => "digital",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::*;

    #[test]
    fn pending_can_ship_or_cancel() {
        assert!(Pending.can_transition_to(Shipped));
        assert!(Pending.can_transition_to(Canceled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn shipped_can_complete_or_cancel() {
        assert!(Shipped.can_transition_to(Completed));
        assert!(Shipped.can_transition_to(Canceled));
        assert!(!Shipped.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for next in [Pending, Shipped, Completed, Canceled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Canceled.can_transition_to(next));
        }
        assert!(Completed.is_terminal());
        assert!(Canceled.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(OrderStatus::parse("shipped"), Some(Shipped));
        assert_eq!(OrderStatus::parse("paid"), None);
        assert_eq!(OrderStatus::parse(""), None);
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
    }
}
