use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::{hex_id, rfc3339};
use crate::model::order::{Order, OrderItem, OrderSummary};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(equal = 24))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub cart_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, max = 30))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub name: String,
    pub selected_size: String,
    pub addons: Vec<String>,
    pub quantity: i32,
    pub total_price: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            product_id: item.product_id.to_hex(),
            name: item.name,
            selected_size: item.selected_size,
            addons: item.addons,
            quantity: item.quantity,
            total_price: item.total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    pub grand_total: f64,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: hex_id(order.id),
            user_id: order.user_id.to_hex(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            grand_total: order.grand_total,
            status: order.status.as_str().to_string(),
            created_at: rfc3339(order.created_at),
            updated_at: rfc3339(order.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: String,
    pub created_at: Option<String>,
    pub grand_total: f64,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        OrderSummaryResponse {
            id: summary.id.to_hex(),
            status: summary.status.as_str().to_string(),
            created_at: rfc3339(summary.created_at),
            grand_total: summary.grand_total,
            items: summary.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub message: String,
    pub order: OrderResponse,
}
