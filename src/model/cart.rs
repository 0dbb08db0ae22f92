use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One configured product in a user's cart. Every add creates a new document;
/// identical variants are grouped by the client, never merged here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub product_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub selected_size: String,
    #[serde(default)]
    pub addons: Vec<String>,
    /// Unit price of this size/addon configuration
    pub total_price: f64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.total_price * f64::from(self.quantity)
    }
}

/// Result of a decrement: either the updated row or the row was deleted.
#[derive(Debug, Clone)]
pub enum DecrementOutcome {
    Decremented(CartItem),
    Removed,
}
