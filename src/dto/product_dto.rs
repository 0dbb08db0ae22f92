use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::{hex_id, rfc3339};
use crate::model::product::{default_status, Product};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub buy1take1: Option<String>,
    pub status: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
}

impl From<ProductRequest> for Product {
    fn from(req: ProductRequest) -> Self {
        Product {
            id: None,
            name: req.name.trim().to_string(),
            category: req.category.trim().to_string(),
            small: req.small,
            medium: req.medium,
            large: req.large,
            buy1take1: req.buy1take1,
            status: req.status.unwrap_or_else(default_status),
            image: req.image,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    #[serde(rename = "buy1take1")]
    pub buy1take1: Option<String>,
    pub status: String,
    pub image: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: hex_id(p.id),
            name: p.name,
            category: p.category,
            small: p.small,
            medium: p.medium,
            large: p.large,
            buy1take1: p.buy1take1,
            status: p.status,
            image: p.image,
            created_at: rfc3339(p.created_at),
            updated_at: rfc3339(p.updated_at),
        }
    }
}
