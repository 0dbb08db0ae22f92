use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::cart::CartItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Preparing,
    #[serde(rename = "Ready to Pick Up")]
    ReadyToPickUp,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Preparing => "Preparing",
            OrderStatus::ReadyToPickUp => "Ready to Pick Up",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preparing" => Ok(OrderStatus::Preparing),
            "ready to pick up" => Ok(OrderStatus::ReadyToPickUp),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Snapshot of a cart line taken when the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ObjectId,
    pub name: String,
    pub selected_size: String,
    #[serde(default)]
    pub addons: Vec<String>,
    pub quantity: i32,
    pub total_price: f64,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        OrderItem {
            product_id: item.product_id,
            name: item.name.clone(),
            selected_size: item.selected_size.clone(),
            addons: item.addons.clone(),
            quantity: item.quantity,
            total_price: item.total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub items: Vec<OrderItem>,
    pub grand_total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl Order {
    /// Builds a `Preparing` order from the given cart lines.
    pub fn from_cart(user_id: ObjectId, cart_items: &[CartItem]) -> Self {
        Order {
            id: None,
            user_id,
            items: cart_items.iter().map(OrderItem::from).collect(),
            grand_total: grand_total(cart_items),
            status: OrderStatus::Preparing,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Sum of unit price times quantity over the given lines.
pub fn grand_total(cart_items: &[CartItem]) -> f64 {
    cart_items.iter().map(CartItem::line_total).sum()
}

/// Reduced projection served to the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<bson::DateTime>,
    pub grand_total: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}
