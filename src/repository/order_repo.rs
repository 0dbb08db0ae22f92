use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use futures::stream::StreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client, ClientSession, Collection, Database,
};
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument, warn};

use crate::model::cart::CartItem;
use crate::model::order::{Order, OrderStatus, OrderSummary};
use crate::model::report::{CategorySales, MonthlySales};
use crate::repository::mongo::{CARTS, ORDERS, PRODUCTS};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts `order` and deletes the cart rows it was built from, atomically.
    /// Fails with `Conflict` if any row in `cart_items` vanished or changed
    /// quantity after it was read.
    async fn place_order(&self, order: Order, cart_items: &[CartItem]) -> RepositoryResult<Order>;
    async fn list_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Order>>;
    async fn list_summaries(&self) -> RepositoryResult<Vec<OrderSummary>>;
    async fn update_status(&self, id: &ObjectId, status: OrderStatus) -> RepositoryResult<Option<Order>>;
    async fn sales_by_month(&self) -> RepositoryResult<Vec<MonthlySales>>;
    async fn sales_by_category(&self) -> RepositoryResult<Vec<CategorySales>>;
}

pub struct MongoOrderRepository {
    client: Client,
    collection: Collection<Order>,
    carts: Collection<Document>,
}

impl MongoOrderRepository {
    pub fn new(client: Client, db: &Database) -> Self {
        MongoOrderRepository {
            client,
            collection: db.collection::<Order>(ORDERS),
            carts: db.collection::<Document>(CARTS),
        }
    }

    async fn write_order(&self, session: &mut ClientSession, order: &Order, cart_items: &[CartItem]) -> RepositoryResult<()> {
        self.collection.insert_one_with_session(order, None, session).await?;
        let removed = self
            .carts
            .delete_many_with_session(snapshot_filter(&order.user_id, cart_items)?, None, session)
            .await?;
        if removed.deleted_count != cart_items.len() as u64 {
            warn!(
                expected = cart_items.len(),
                deleted = removed.deleted_count,
                "Cart changed while placing order"
            );
            return Err(RepositoryError::conflict("Some cart items were already ordered or removed"));
        }
        Ok(())
    }

    async fn drain<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        mut cursor: mongodb::Cursor<T>,
        what: &str,
    ) -> RepositoryResult<Vec<T>> {
        let mut rows = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(r) => rows.push(r),
                Err(e) => {
                    error!("Failed to deserialize {}: {}", what, e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize {}: {}", what, e)));
                }
            }
        }
        Ok(rows)
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> RepositoryResult<Vec<Document>> {
        let cursor = self.collection.aggregate(pipeline, None).await?;
        self.drain(cursor, "aggregation row").await
    }
}

/// Matches the cart rows only while they still hold the quantities the order was priced from.
fn snapshot_filter(user_id: &ObjectId, cart_items: &[CartItem]) -> RepositoryResult<Document> {
    let rows = cart_items
        .iter()
        .map(|item| {
            item.id
                .map(|id| doc! { "_id": id, "quantity": item.quantity })
                .ok_or_else(|| RepositoryError::conflict("Cart item has no id"))
        })
        .collect::<RepositoryResult<Vec<Document>>>()?;
    if rows.is_empty() {
        return Err(RepositoryError::conflict("No cart items to order"));
    }
    Ok(doc! { "userId": user_id, "$or": rows })
}

fn completed_stage() -> Document {
    doc! { "$match": { "status": OrderStatus::Completed.as_str() } }
}

/// Totals come back as double or integer depending on what was summed.
fn number(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

fn monthly_row(row: &Document) -> RepositoryResult<MonthlySales> {
    let key = row.get_document("_id")?;
    Ok(MonthlySales {
        year: key.get_i32("year")?,
        month: key.get_i32("month")? as u32,
        total: number(row, "total"),
    })
}

fn category_row(row: &Document) -> RepositoryResult<CategorySales> {
    Ok(CategorySales {
        category: row.get_str("_id")?.to_string(),
        total: number(row, "total"),
    })
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self, order, cart_items), fields(user_id = %order.user_id, items = cart_items.len()))]
    async fn place_order(&self, mut order: Order, cart_items: &[CartItem]) -> RepositoryResult<Order> {
        order.id = Some(ObjectId::new());
        let now = bson::DateTime::now();
        order.created_at = Some(now);
        order.updated_at = Some(now);

        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match self.write_order(&mut session, &order, cart_items).await {
            Ok(()) => {
                session.commit_transaction().await?;
                info!(grand_total = order.grand_total, "Order placed");
                Ok(order)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    error!("Failed to abort order transaction: {}", abort_err);
                }
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Order>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self.collection.find(doc! { "userId": user_id }, options).await?;
        self.drain(cursor, "order").await
    }

    #[instrument(skip(self))]
    async fn list_summaries(&self) -> RepositoryResult<Vec<OrderSummary>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .projection(doc! { "status": 1, "createdAt": 1, "grandTotal": 1, "items": 1 })
            .build();
        let cursor = self
            .collection
            .clone_with_type::<OrderSummary>()
            .find(None, options)
            .await?;
        let summaries = self.drain(cursor, "order summary").await?;
        info!("Fetched {} orders", summaries.len());
        Ok(summaries)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &ObjectId, status: OrderStatus) -> RepositoryResult<Option<Order>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": status.as_str(), "updatedAt": bson::DateTime::now() } },
                options,
            )
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn sales_by_month(&self) -> RepositoryResult<Vec<MonthlySales>> {
        let pipeline = vec![
            completed_stage(),
            doc! { "$group": {
                "_id": { "year": { "$year": "$createdAt" }, "month": { "$month": "$createdAt" } },
                "total": { "$sum": "$grandTotal" },
            } },
            doc! { "$sort": { "_id.year": 1, "_id.month": 1 } },
        ];
        self.aggregate(pipeline).await?.iter().map(monthly_row).collect()
    }

    #[instrument(skip(self))]
    async fn sales_by_category(&self) -> RepositoryResult<Vec<CategorySales>> {
        let pipeline = vec![
            completed_stage(),
            doc! { "$unwind": "$items" },
            doc! { "$lookup": {
                "from": PRODUCTS,
                "localField": "items.productId",
                "foreignField": "_id",
                "as": "product",
            } },
            doc! { "$unwind": { "path": "$product", "preserveNullAndEmptyArrays": true } },
            doc! { "$group": {
                "_id": { "$ifNull": ["$product.category", "Uncategorized"] },
                "total": { "$sum": "$items.totalPrice" },
            } },
            doc! { "$sort": { "total": -1 } },
        ];
        self.aggregate(pipeline).await?.iter().map(category_row).collect()
    }
}
