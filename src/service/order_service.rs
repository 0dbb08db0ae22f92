use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use crate::model::order::{Order, OrderStatus, OrderSummary};
use crate::repository::cart_repo::CartRepository;
use crate::repository::order_repo::OrderRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Moves the selected cart rows of `user_id` into a new `Preparing` order.
    async fn create_order(&self, user_id: ObjectId, cart_item_ids: Vec<ObjectId>) -> Result<Order, ServiceError>;
    async fn list_orders_for_user(&self, user_id: ObjectId) -> Result<Vec<Order>, ServiceError>;
    async fn list_all_orders(&self) -> Result<Vec<OrderSummary>, ServiceError>;
    async fn update_order_status(&self, id: ObjectId, status: OrderStatus) -> Result<Order, ServiceError>;
}

pub struct OrderServiceImpl {
    pub order_repo: Arc<dyn OrderRepository>,
    pub cart_repo: Arc<dyn CartRepository>,
}

impl OrderServiceImpl {
    pub fn new(order_repo: Arc<dyn OrderRepository>, cart_repo: Arc<dyn CartRepository>) -> Self {
        Self { order_repo, cart_repo }
    }
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    #[instrument(skip(self, cart_item_ids), fields(requested = cart_item_ids.len()))]
    async fn create_order(&self, user_id: ObjectId, mut cart_item_ids: Vec<ObjectId>) -> Result<Order, ServiceError> {
        let mut seen = HashSet::new();
        cart_item_ids.retain(|id| seen.insert(*id));
        if cart_item_ids.is_empty() {
            return Err(ServiceError::InvalidInput("No cart items selected".to_string()));
        }

        let items = self.cart_repo.find_by_ids_for_user(&user_id, &cart_item_ids).await?;
        if items.is_empty() {
            warn!("None of the selected cart items belong to the user");
            return Err(ServiceError::InvalidInput("No valid cart items found".to_string()));
        }

        let order = Order::from_cart(user_id, &items);
        let placed = self.order_repo.place_order(order, &items).await?;
        info!(grand_total = placed.grand_total, items = items.len(), "Order created");
        Ok(placed)
    }

    #[instrument(skip(self))]
    async fn list_orders_for_user(&self, user_id: ObjectId) -> Result<Vec<Order>, ServiceError> {
        Ok(self.order_repo.list_by_user(&user_id).await?)
    }

    #[instrument(skip(self))]
    async fn list_all_orders(&self) -> Result<Vec<OrderSummary>, ServiceError> {
        Ok(self.order_repo.list_summaries().await?)
    }

    #[instrument(skip(self), fields(status = status.as_str()))]
    async fn update_order_status(&self, id: ObjectId, status: OrderStatus) -> Result<Order, ServiceError> {
        let updated = self
            .order_repo
            .update_status(&id, status)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
        info!("Order status updated");
        Ok(updated)
    }
}
