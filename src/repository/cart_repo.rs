use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};
use tracing::{debug, error, info, instrument, warn};

use crate::model::cart::{CartItem, DecrementOutcome};
use crate::repository::mongo::CARTS;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Upper bound on decrement attempts lost to concurrent writers.
const DECREMENT_ATTEMPTS: usize = 5;

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn insert(&self, item: CartItem) -> RepositoryResult<CartItem>;
    async fn find_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<CartItem>>;
    /// Only the rows in `ids` that belong to `user_id`; unknown or foreign ids are dropped.
    async fn find_by_ids_for_user(&self, user_id: &ObjectId, ids: &[ObjectId]) -> RepositoryResult<Vec<CartItem>>;
    async fn increment(&self, id: &ObjectId) -> RepositoryResult<CartItem>;
    /// Decrements, or deletes the row when the quantity would drop to zero.
    async fn decrement_or_remove(&self, id: &ObjectId) -> RepositoryResult<DecrementOutcome>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoCartRepository {
    collection: Collection<CartItem>,
}

impl MongoCartRepository {
    pub fn new(db: &Database) -> Self {
        MongoCartRepository { collection: db.collection::<CartItem>(CARTS) }
    }

    async fn collect(&self, filter: bson::Document) -> RepositoryResult<Vec<CartItem>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": 1 }).build();
        let mut cursor = self.collection.find(filter, options).await?;
        let mut items = Vec::new();
        while let Some(item) = cursor.next().await {
            match item {
                Ok(i) => items.push(i),
                Err(e) => {
                    error!("Failed to deserialize cart item: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize cart item: {}", e)));
                }
            }
        }
        Ok(items)
    }
}

fn after_update() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

#[async_trait]
impl CartRepository for MongoCartRepository {
    #[instrument(skip(self, item), fields(user_id = %item.user_id, product_id = %item.product_id))]
    async fn insert(&self, mut item: CartItem) -> RepositoryResult<CartItem> {
        item.id = Some(ObjectId::new());
        item.created_at = Some(bson::DateTime::now());
        self.collection.insert_one(&item, None).await?;
        info!("Cart item added");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<CartItem>> {
        self.collect(doc! { "userId": user_id }).await
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn find_by_ids_for_user(&self, user_id: &ObjectId, ids: &[ObjectId]) -> RepositoryResult<Vec<CartItem>> {
        let items = self.collect(doc! { "_id": { "$in": ids.to_vec() }, "userId": user_id }).await?;
        debug!("Matched {} of {} cart items", items.len(), ids.len());
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn increment(&self, id: &ObjectId) -> RepositoryResult<CartItem> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "quantity": 1 } }, after_update())
            .await?;
        updated.ok_or_else(|| RepositoryError::not_found(format!("Cart item not found for ID: {}", id)))
    }

    #[instrument(skip(self))]
    async fn decrement_or_remove(&self, id: &ObjectId) -> RepositoryResult<DecrementOutcome> {
        for _ in 0..DECREMENT_ATTEMPTS {
            let decremented = self
                .collection
                .find_one_and_update(
                    doc! { "_id": id, "quantity": { "$gt": 1 } },
                    doc! { "$inc": { "quantity": -1 } },
                    after_update(),
                )
                .await?;
            if let Some(item) = decremented {
                return Ok(DecrementOutcome::Decremented(item));
            }

            let removed = self
                .collection
                .delete_one(doc! { "_id": id, "quantity": { "$lte": 1 } }, None)
                .await?;
            if removed.deleted_count > 0 {
                info!("Cart item removed on decrement");
                return Ok(DecrementOutcome::Removed);
            }

            // Neither guard matched: the row is gone, or an increment raced us.
            if self.collection.find_one(doc! { "_id": id }, None).await?.is_none() {
                return Err(RepositoryError::not_found(format!("Cart item not found for ID: {}", id)));
            }
            warn!("Concurrent update on cart item, retrying decrement");
        }
        Err(RepositoryError::conflict(format!("Cart item {} kept changing during decrement", id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::not_found(format!("Cart item not found for ID: {}", id)));
        }
        info!("Cart item removed");
        Ok(())
    }
}
