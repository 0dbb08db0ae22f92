use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info, instrument};

use crate::model::purchase::Purchase;
use crate::repository::mongo::PURCHASES;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn insert(&self, purchase: Purchase) -> RepositoryResult<Purchase>;
    /// Newest first.
    async fn list(&self) -> RepositoryResult<Vec<Purchase>>;
    async fn count(&self) -> RepositoryResult<u64>;
    /// Purchases with `start <= createdAt < end`, oldest first.
    async fn list_between(&self, start: bson::DateTime, end: bson::DateTime) -> RepositoryResult<Vec<Purchase>>;
}

pub struct MongoPurchaseRepository {
    collection: Collection<Purchase>,
}

impl MongoPurchaseRepository {
    pub fn new(db: &Database) -> Self {
        MongoPurchaseRepository { collection: db.collection::<Purchase>(PURCHASES) }
    }

    async fn find_sorted(&self, filter: Option<Document>, direction: i32) -> RepositoryResult<Vec<Purchase>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": direction }).build();
        let mut cursor = self.collection.find(filter, options).await?;
        let mut purchases = Vec::new();
        while let Some(purchase) = cursor.next().await {
            match purchase {
                Ok(p) => purchases.push(p),
                Err(e) => {
                    error!("Failed to deserialize purchase: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize purchase: {}", e)));
                }
            }
        }
        Ok(purchases)
    }
}

#[async_trait]
impl PurchaseRepository for MongoPurchaseRepository {
    #[instrument(skip(self, purchase), fields(total = purchase.total))]
    async fn insert(&self, mut purchase: Purchase) -> RepositoryResult<Purchase> {
        purchase.id = Some(ObjectId::new());
        purchase.created_at = Some(bson::DateTime::now());
        self.collection.insert_one(&purchase, None).await?;
        info!("Purchase recorded");
        Ok(purchase)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<Purchase>> {
        self.find_sorted(None, -1).await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepositoryResult<u64> {
        match self.collection.count_documents(None, None).await {
            Ok(count) => Ok(count),
            Err(e) => {
                error!("Failed to count purchases: {}", e);
                Err(RepositoryError::database(format!("Failed to count purchases: {}", e)))
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_between(&self, start: bson::DateTime, end: bson::DateTime) -> RepositoryResult<Vec<Purchase>> {
        self.find_sorted(Some(doc! { "createdAt": { "$gte": start, "$lt": end } }), 1).await
    }
}
