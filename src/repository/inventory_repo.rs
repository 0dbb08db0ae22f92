use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};
use tracing::{error, info, instrument};

use crate::model::inventory::InventoryItem;
use crate::repository::mongo::INVENTORIES;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<InventoryItem>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<InventoryItem>>;
    async fn insert(&self, item: InventoryItem) -> RepositoryResult<InventoryItem>;
    async fn update(&self, id: &ObjectId, item: InventoryItem) -> RepositoryResult<Option<InventoryItem>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoInventoryRepository {
    collection: Collection<InventoryItem>,
}

impl MongoInventoryRepository {
    pub fn new(db: &Database) -> Self {
        MongoInventoryRepository { collection: db.collection::<InventoryItem>(INVENTORIES) }
    }
}

#[async_trait]
impl InventoryRepository for MongoInventoryRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<InventoryItem>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let mut cursor = self.collection.find(None, options).await?;
        let mut items = Vec::new();
        while let Some(item) = cursor.next().await {
            match item {
                Ok(i) => items.push(i),
                Err(e) => {
                    error!("Failed to deserialize inventory item: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize inventory item: {}", e)));
                }
            }
        }
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<InventoryItem>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    #[instrument(skip(self, item), fields(name = %item.name, stock = item.stock))]
    async fn insert(&self, mut item: InventoryItem) -> RepositoryResult<InventoryItem> {
        item.id = Some(ObjectId::new());
        let now = bson::DateTime::now();
        item.created_at = Some(now);
        item.updated_at = Some(now);
        item.refresh_status();
        self.collection.insert_one(&item, None).await?;
        info!("Inventory item created");
        Ok(item)
    }

    #[instrument(skip(self, item), fields(stock = item.stock))]
    async fn update(&self, id: &ObjectId, mut item: InventoryItem) -> RepositoryResult<Option<InventoryItem>> {
        item.refresh_status();
        let mut fields = bson::to_document(&item)?;
        fields.remove("_id");
        fields.remove("createdAt");
        fields.insert("updatedAt", bson::DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields }, options)
            .await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::not_found(format!("Inventory item not found for ID: {}", id)));
        }
        info!("Inventory item deleted");
        Ok(())
    }
}
