use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::model::product::Product;
use crate::repository::product_repo::ProductRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ServiceError>;
    async fn add_product(&self, product: Product) -> Result<Product, ServiceError>;
    async fn update_product(&self, id: ObjectId, product: Product) -> Result<Product, ServiceError>;
    async fn delete_product(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct ProductServiceImpl {
    pub product_repo: Arc<dyn ProductRepository>,
}

impl ProductServiceImpl {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }
}

fn check(product: &Product) -> Result<(), ServiceError> {
    if product.name.trim().is_empty() || product.category.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Product name and category are required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.product_repo.list().await?)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn add_product(&self, product: Product) -> Result<Product, ServiceError> {
        check(&product)?;
        let created = self.product_repo.insert(product).await?;
        info!("Product added");
        Ok(created)
    }

    #[instrument(skip(self, product))]
    async fn update_product(&self, id: ObjectId, product: Product) -> Result<Product, ServiceError> {
        check(&product)?;
        self.product_repo
            .update(&id, product)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.product_repo.delete(&id).await?;
        Ok(())
    }
}
