use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::model::inventory::InventoryItem;
use crate::repository::inventory_repo::InventoryRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn list(&self) -> Result<Vec<InventoryItem>, ServiceError>;
    async fn get(&self, id: ObjectId) -> Result<InventoryItem, ServiceError>;
    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, ServiceError>;
    async fn update(&self, id: ObjectId, item: InventoryItem) -> Result<InventoryItem, ServiceError>;
    async fn delete(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct InventoryServiceImpl {
    pub inventory_repo: Arc<dyn InventoryRepository>,
}

impl InventoryServiceImpl {
    pub fn new(inventory_repo: Arc<dyn InventoryRepository>) -> Self {
        Self { inventory_repo }
    }
}

fn check(item: &InventoryItem) -> Result<(), ServiceError> {
    if item.name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Item name is required".to_string()));
    }
    if item.stock < 0 {
        return Err(ServiceError::InvalidInput("Stock cannot be negative".to_string()));
    }
    Ok(())
}

#[async_trait]
impl InventoryService for InventoryServiceImpl {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(self.inventory_repo.list().await?)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: ObjectId) -> Result<InventoryItem, ServiceError> {
        self.inventory_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Inventory item not found".to_string()))
    }

    #[instrument(skip(self, item), fields(name = %item.name, stock = item.stock))]
    async fn create(&self, mut item: InventoryItem) -> Result<InventoryItem, ServiceError> {
        check(&item)?;
        item.refresh_status();
        let created = self.inventory_repo.insert(item).await?;
        info!(status = ?created.status, "Inventory item created");
        Ok(created)
    }

    #[instrument(skip(self, item), fields(stock = item.stock))]
    async fn update(&self, id: ObjectId, mut item: InventoryItem) -> Result<InventoryItem, ServiceError> {
        check(&item)?;
        item.refresh_status();
        self.inventory_repo
            .update(&id, item)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Inventory item not found".to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.inventory_repo.delete(&id).await?;
        Ok(())
    }
}
