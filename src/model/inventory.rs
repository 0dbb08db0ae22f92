use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Stock level below which an item is flagged as low.
pub const LOW_STOCK_THRESHOLD: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    pub fn from_stock(stock: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub stock: i64,
    #[serde(default)]
    pub unit: Option<String>,
    pub status: StockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl InventoryItem {
    pub fn new(name: String, category: Option<String>, stock: i64, unit: Option<String>) -> Self {
        InventoryItem {
            id: None,
            name,
            category,
            stock,
            unit,
            status: StockStatus::from_stock(stock),
            created_at: None,
            updated_at: None,
        }
    }

    /// Re-derives `status` from `stock`; stored statuses are never trusted.
    pub fn refresh_status(&mut self) {
        self.status = StockStatus::from_stock(self.stock);
    }
}
