use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::model::cart::{CartItem, DecrementOutcome};
use crate::repository::cart_repo::CartRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait CartService: Send + Sync {
    /// Always inserts a new row; identical variants are not merged.
    async fn add_to_cart(&self, item: CartItem) -> Result<CartItem, ServiceError>;
    async fn list_cart(&self, user_id: ObjectId) -> Result<Vec<CartItem>, ServiceError>;
    async fn increment_quantity(&self, id: ObjectId) -> Result<CartItem, ServiceError>;
    async fn decrement_quantity(&self, id: ObjectId) -> Result<DecrementOutcome, ServiceError>;
    async fn remove_item(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct CartServiceImpl {
    pub cart_repo: Arc<dyn CartRepository>,
}

impl CartServiceImpl {
    pub fn new(cart_repo: Arc<dyn CartRepository>) -> Self {
        Self { cart_repo }
    }
}

#[async_trait]
impl CartService for CartServiceImpl {
    #[instrument(skip(self, item), fields(user_id = %item.user_id, product_id = %item.product_id))]
    async fn add_to_cart(&self, item: CartItem) -> Result<CartItem, ServiceError> {
        if item.quantity < 1 {
            return Err(ServiceError::InvalidInput("Quantity must be at least 1".to_string()));
        }
        if !item.total_price.is_finite() || item.total_price < 0.0 {
            return Err(ServiceError::InvalidInput("Price must be a non-negative number".to_string()));
        }
        let created = self.cart_repo.insert(item).await?;
        info!("Item added to cart");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_cart(&self, user_id: ObjectId) -> Result<Vec<CartItem>, ServiceError> {
        Ok(self.cart_repo.find_by_user(&user_id).await?)
    }

    #[instrument(skip(self))]
    async fn increment_quantity(&self, id: ObjectId) -> Result<CartItem, ServiceError> {
        Ok(self.cart_repo.increment(&id).await?)
    }

    #[instrument(skip(self))]
    async fn decrement_quantity(&self, id: ObjectId) -> Result<DecrementOutcome, ServiceError> {
        Ok(self.cart_repo.decrement_or_remove(&id).await?)
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.cart_repo.delete(&id).await?;
        Ok(())
    }
}
