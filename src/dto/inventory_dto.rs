use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::{hex_id, rfc3339};
use crate::model::inventory::{InventoryItem, StockStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InventoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock: i64,
    pub unit: Option<String>,
}

impl From<InventoryRequest> for InventoryItem {
    fn from(req: InventoryRequest) -> Self {
        InventoryItem::new(req.name.trim().to_string(), req.category, req.stock, req.unit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub stock: i64,
    pub unit: Option<String>,
    pub status: StockStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<InventoryItem> for InventoryResponse {
    fn from(item: InventoryItem) -> Self {
        InventoryResponse {
            id: hex_id(item.id),
            name: item.name,
            category: item.category,
            stock: item.stock,
            unit: item.unit,
            // stored status may predate a threshold change
            status: StockStatus::from_stock(item.stock),
            created_at: rfc3339(item.created_at),
            updated_at: rfc3339(item.updated_at),
        }
    }
}
