use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::{hex_id, rfc3339};
use crate::model::cart::CartItem;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[validate(length(equal = 24))]
    pub user_id: String,
    #[validate(length(equal = 24))]
    pub product_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub image: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub selected_size: String,
    #[serde(default)]
    pub addons: Vec<String>,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub selected_size: String,
    pub addons: Vec<String>,
    pub total_price: f64,
    pub quantity: i32,
    pub created_at: Option<String>,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            id: hex_id(item.id),
            user_id: item.user_id.to_hex(),
            product_id: item.product_id.to_hex(),
            name: item.name,
            image: item.image,
            selected_size: item.selected_size,
            addons: item.addons,
            total_price: item.total_price,
            quantity: item.quantity,
            created_at: rfc3339(item.created_at),
        }
    }
}

/// `item` is absent when the decrement removed the row.
#[derive(Debug, Serialize)]
pub struct DecrementResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<CartItemResponse>,
}
