//! Runs against a live MongoDB replica set (transactions need one):
//! `MONGO_URI=... MONGO_DATABASE=... cargo test --test order_repo_test -- --ignored`

use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use tea_shop_backend::config::MongoConfig;
use tea_shop_backend::model::cart::CartItem;
use tea_shop_backend::model::order::{Order, OrderItem, OrderStatus};
use tea_shop_backend::model::product::Product;
use tea_shop_backend::repository::mongo::{MongoStore, CARTS, ORDERS, PRODUCTS};
use tea_shop_backend::repository::order_repo::{MongoOrderRepository, OrderRepository};
use tea_shop_backend::repository::repository_error::RepositoryError;

/// Each test gets its own throwaway database.
async fn setup() -> (MongoOrderRepository, Database) {
    let _ = dotenv::dotenv();
    let mut config = MongoConfig::from_env().expect("Failed to load MongoConfig");
    config.database = format!("tea_shop_test_{}", ObjectId::new().to_hex());
    let store = MongoStore::connect(&config).await.expect("Failed to connect to MongoDB");
    let repo = MongoOrderRepository::new(store.client.clone(), &store.database);
    (repo, store.database)
}

fn at(year: i32, month: u32) -> DateTime {
    let day = chrono::NaiveDate::from_ymd_opt(year, month, 10)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
        .and_utc();
    DateTime::from_chrono(day)
}

fn line(product_id: ObjectId, price: f64, quantity: i32) -> OrderItem {
    OrderItem {
        product_id,
        name: "Tea".to_string(),
        selected_size: "Medium".to_string(),
        addons: vec![],
        quantity,
        total_price: price,
    }
}

fn order(status: OrderStatus, created_at: DateTime, items: Vec<OrderItem>, grand_total: f64) -> Order {
    Order {
        id: None,
        user_id: ObjectId::new(),
        items,
        grand_total,
        status,
        created_at: Some(created_at),
        updated_at: Some(created_at),
    }
}

async fn product(db: &Database, name: &str, category: &str) -> ObjectId {
    let id = ObjectId::new();
    let product = Product {
        id: Some(id),
        name: name.to_string(),
        category: category.to_string(),
        small: None,
        medium: Some("35".to_string()),
        large: None,
        buy1take1: None,
        status: "Available".to_string(),
        image: None,
        created_at: None,
        updated_at: None,
    };
    db.collection::<Product>(PRODUCTS).insert_one(product, None).await.unwrap();
    id
}

async fn cart_row(db: &Database, user_id: ObjectId, quantity: i32) -> CartItem {
    let item = CartItem {
        id: Some(ObjectId::new()),
        user_id,
        product_id: ObjectId::new(),
        name: "Wintermelon".to_string(),
        image: None,
        selected_size: "Medium".to_string(),
        addons: vec!["Pearl".to_string()],
        total_price: 35.0,
        quantity,
        created_at: Some(DateTime::now()),
    };
    db.collection::<CartItem>(CARTS).insert_one(&item, None).await.unwrap();
    item
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn test_sales_by_month_counts_completed_orders_only() {
    let (repo, db) = setup().await;
    let tea = ObjectId::new();
    let orders = db.collection::<Order>(ORDERS);
    orders
        .insert_many(
            vec![
                order(OrderStatus::Completed, at(2025, 2), vec![line(tea, 40.0, 1)], 40.0),
                order(OrderStatus::Completed, at(2025, 1), vec![line(tea, 35.0, 2)], 70.0),
                order(OrderStatus::Completed, at(2025, 1), vec![line(tea, 30.0, 1)], 30.0),
                order(OrderStatus::Preparing, at(2025, 1), vec![line(tea, 99.0, 1)], 99.0),
                order(OrderStatus::Cancelled, at(2025, 3), vec![line(tea, 50.0, 1)], 50.0),
            ],
            None,
        )
        .await
        .unwrap();

    let monthly = repo.sales_by_month().await.unwrap();
    let rows: Vec<(i32, u32, f64)> = monthly.iter().map(|m| (m.year, m.month, m.total)).collect();
    assert_eq!(rows, vec![(2025, 1, 100.0), (2025, 2, 40.0)]);

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn test_sales_by_category_joins_products() {
    let (repo, db) = setup().await;
    let milk_tea = product(&db, "Okinawa", "Milk Tea").await;
    let fruit_tea = product(&db, "Lychee", "Fruit Tea").await;
    let deleted = ObjectId::new();

    db.collection::<Order>(ORDERS)
        .insert_many(
            vec![
                order(
                    OrderStatus::Completed,
                    at(2025, 4),
                    vec![line(milk_tea, 40.0, 1), line(fruit_tea, 25.0, 1)],
                    65.0,
                ),
                order(OrderStatus::Completed, at(2025, 5), vec![line(milk_tea, 45.0, 1)], 45.0),
                order(OrderStatus::Completed, at(2025, 5), vec![line(deleted, 10.0, 1)], 10.0),
                order(OrderStatus::ReadyToPickUp, at(2025, 5), vec![line(fruit_tea, 500.0, 1)], 500.0),
            ],
            None,
        )
        .await
        .unwrap();

    let categories = repo.sales_by_category().await.unwrap();
    let rows: Vec<(&str, f64)> = categories.iter().map(|c| (c.category.as_str(), c.total)).collect();
    assert_eq!(rows, vec![("Milk Tea", 85.0), ("Fruit Tea", 25.0), ("Uncategorized", 10.0)]);

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn test_place_order_moves_cart_rows() {
    let (repo, db) = setup().await;
    let user_id = ObjectId::new();
    let row = cart_row(&db, user_id, 2).await;
    let snapshot = vec![row];

    let placed = repo.place_order(Order::from_cart(user_id, &snapshot), &snapshot).await.unwrap();
    assert!(placed.id.is_some());
    assert_eq!(placed.grand_total, 70.0);

    let left = db.collection::<CartItem>(CARTS).count_documents(doc! { "userId": user_id }, None).await.unwrap();
    assert_eq!(left, 0);
    assert_eq!(repo.list_by_user(&user_id).await.unwrap().len(), 1);

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn test_place_order_conflicts_when_cart_changed() {
    let (repo, db) = setup().await;
    let user_id = ObjectId::new();
    let carts = db.collection::<CartItem>(CARTS);

    // one selected row is already gone
    let kept = cart_row(&db, user_id, 1).await;
    let mut vanished = kept.clone();
    vanished.id = Some(ObjectId::new());
    let snapshot = vec![kept.clone(), vanished];
    let err = repo.place_order(Order::from_cart(user_id, &snapshot), &snapshot).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // quantity bumped after the read
    let snapshot = vec![kept.clone()];
    carts
        .update_one(doc! { "_id": kept.id }, doc! { "$inc": { "quantity": 1 } }, None)
        .await
        .unwrap();
    let err = repo.place_order(Order::from_cart(user_id, &snapshot), &snapshot).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // both attempts rolled back
    assert!(repo.list_by_user(&user_id).await.unwrap().is_empty());
    let row = carts.find_one(doc! { "_id": kept.id }, None).await.unwrap().unwrap();
    assert_eq!(row.quantity, 2);

    db.drop(None).await.unwrap();
}
