pub mod cart_dto;
pub mod inventory_dto;
pub mod order_dto;
pub mod product_dto;
pub mod purchase_dto;
pub mod user_dto;

use bson::oid::ObjectId;
use serde::Serialize;

/// Hex form of an id; unsaved documents render as an empty string.
pub fn hex_id(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}

pub fn rfc3339(date: Option<bson::DateTime>) -> Option<String> {
    date.map(|d| d.to_chrono().to_rfc3339())
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}
