use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::{hex_id, rfc3339};
use crate::model::purchase::{Purchase, PurchaseItem};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub category: Option<String>,
    pub size: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

impl From<PurchaseItemRequest> for PurchaseItem {
    fn from(req: PurchaseItemRequest) -> Self {
        PurchaseItem {
            name: req.name,
            category: req.category,
            size: req.size,
            quantity: req.quantity,
            price: req.price,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPurchaseRequest {
    #[validate(length(min = 1), nested)]
    pub items: Vec<PurchaseItemRequest>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub range: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub items: Vec<PurchaseItem>,
    pub total: f64,
    pub payment_method: Option<String>,
    pub created_at: Option<String>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(p: Purchase) -> Self {
        PurchaseResponse {
            id: hex_id(p.id),
            items: p.items,
            total: p.total,
            payment_method: p.payment_method,
            created_at: rfc3339(p.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}
