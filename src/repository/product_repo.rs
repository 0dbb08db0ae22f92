use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};
use tracing::{error, info, instrument};

use crate::model::product::Product;
use crate::repository::mongo::PRODUCTS;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<Product>>;
    async fn insert(&self, product: Product) -> RepositoryResult<Product>;
    /// Replaces every editable field; `None` when the id is unknown.
    async fn update(&self, id: &ObjectId, product: Product) -> RepositoryResult<Option<Product>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        MongoProductRepository { collection: db.collection::<Product>(PRODUCTS) }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let mut cursor = self.collection.find(None, options).await?;
        let mut products = Vec::new();
        while let Some(product) = cursor.next().await {
            match product {
                Ok(p) => products.push(p),
                Err(e) => {
                    error!("Failed to deserialize product: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize product: {}", e)));
                }
            }
        }
        info!("Fetched {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn insert(&self, mut product: Product) -> RepositoryResult<Product> {
        product.id = Some(ObjectId::new());
        let now = bson::DateTime::now();
        product.created_at = Some(now);
        product.updated_at = Some(now);
        self.collection.insert_one(&product, None).await?;
        info!("Product created");
        Ok(product)
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: &ObjectId, product: Product) -> RepositoryResult<Option<Product>> {
        let mut fields = bson::to_document(&product)?;
        fields.remove("_id");
        fields.remove("createdAt");
        fields.insert("updatedAt", bson::DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields }, options)
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            error!("No product found to delete for ID: {}", id);
            return Err(RepositoryError::not_found(format!("No product found for ID: {}", id)));
        }
        info!("Product deleted");
        Ok(())
    }
}
