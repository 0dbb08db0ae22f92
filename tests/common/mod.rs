#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::oid::ObjectId;

use tea_shop_backend::app::app::Services;
use tea_shop_backend::config::{JwtConfig, OtpConfig};
use tea_shop_backend::model::cart::{CartItem, DecrementOutcome};
use tea_shop_backend::model::inventory::InventoryItem;
use tea_shop_backend::model::order::{Order, OrderStatus, OrderSummary};
use tea_shop_backend::model::product::Product;
use tea_shop_backend::model::purchase::Purchase;
use tea_shop_backend::model::report::{CategorySales, MonthlySales};
use tea_shop_backend::model::user::{ProfileUpdate, User};
use tea_shop_backend::repository::cart_repo::CartRepository;
use tea_shop_backend::repository::inventory_repo::InventoryRepository;
use tea_shop_backend::repository::order_repo::OrderRepository;
use tea_shop_backend::repository::product_repo::ProductRepository;
use tea_shop_backend::repository::purchase_repo::PurchaseRepository;
use tea_shop_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use tea_shop_backend::repository::user_repo::UserRepository;
use tea_shop_backend::service::cart_service::CartServiceImpl;
use tea_shop_backend::service::inventory_service::InventoryServiceImpl;
use tea_shop_backend::service::order_service::OrderServiceImpl;
use tea_shop_backend::service::product_service::ProductServiceImpl;
use tea_shop_backend::service::purchase_service::PurchaseServiceImpl;
use tea_shop_backend::service::report_service::ReportServiceImpl;
use tea_shop_backend::service::user_service::UserServiceImpl;
use tea_shop_backend::util::email::{EmailError, Mailer};
use tea_shop_backend::util::jwt::JwtTokenUtilsImpl;

// ---------- users ----------

#[derive(Default)]
pub struct MockUserRepository {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::already_exists("email"));
        }
        user.id = Some(ObjectId::new());
        user.created_at = Some(bson::DateTime::now());
        user.updated_at = user.created_at;
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == Some(*id)).cloned())
    }

    async fn update_profile(&self, id: &ObjectId, update: ProfileUpdate) -> RepositoryResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == Some(*id)) else {
            return Ok(None);
        };
        if let Some(v) = update.username {
            user.username = v;
        }
        if update.nickname.is_some() {
            user.nickname = update.nickname;
        }
        if update.phone.is_some() {
            user.phone = update.phone;
        }
        if update.address.is_some() {
            user.address = update.address;
        }
        if update.image.is_some() {
            user.image = update.image;
        }
        Ok(Some(user.clone()))
    }

    async fn set_otp(&self, id: &ObjectId, otp: &str, expires: bson::DateTime) -> RepositoryResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == Some(*id))
            .ok_or_else(|| RepositoryError::not_found("user"))?;
        user.otp = Some(otp.to_string());
        user.otp_expires = Some(expires);
        Ok(())
    }

    async fn reset_password(&self, id: &ObjectId, password_hash: &str) -> RepositoryResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == Some(*id))
            .ok_or_else(|| RepositoryError::not_found("user"))?;
        user.password_hash = password_hash.to_string();
        user.otp = None;
        user.otp_expires = None;
        Ok(())
    }

    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> RepositoryResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == Some(*id))
            .ok_or_else(|| RepositoryError::not_found("user"))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

impl MockUserRepository {
    pub fn stored(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.email == email).cloned()
    }

    /// Overwrites the stored OTP expiry, e.g. to simulate an expired code.
    pub fn expire_otp(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.otp_expires = Some(bson::DateTime::from_millis(0));
        }
    }
}

/// Records every OTP it is asked to deliver.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        RecordingMailer { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub fn last_otp(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, otp)| otp.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_otp_email(&self, to: &str, _user_name: &str, otp: &str, _expires_in_minutes: u64) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::SmtpError("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push((to.to_string(), otp.to_string()));
        Ok(())
    }
}

// ---------- products ----------

#[derive(Default)]
pub struct MockProductRepository {
    pub products: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn insert(&self, mut product: Product) -> RepositoryResult<Product> {
        product.id = Some(ObjectId::new());
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &ObjectId, mut product: Product) -> RepositoryResult<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        let Some(slot) = products.iter_mut().find(|p| p.id == Some(*id)) else {
            return Ok(None);
        };
        product.id = Some(*id);
        *slot = product.clone();
        Ok(Some(product))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != Some(*id));
        if products.len() == before {
            return Err(RepositoryError::not_found("Product not found"));
        }
        Ok(())
    }
}

// ---------- cart ----------

#[derive(Default)]
pub struct MockCartRepository {
    pub items: Mutex<Vec<CartItem>>,
}

impl MockCartRepository {
    pub fn ids(&self) -> Vec<ObjectId> {
        self.items.lock().unwrap().iter().filter_map(|i| i.id).collect()
    }
}

#[async_trait]
impl CartRepository for MockCartRepository {
    async fn insert(&self, mut item: CartItem) -> RepositoryResult<CartItem> {
        item.id = Some(ObjectId::new());
        item.created_at = Some(bson::DateTime::now());
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn find_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<CartItem>> {
        Ok(self.items.lock().unwrap().iter().filter(|i| i.user_id == *user_id).cloned().collect())
    }

    async fn find_by_ids_for_user(&self, user_id: &ObjectId, ids: &[ObjectId]) -> RepositoryResult<Vec<CartItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == *user_id && i.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn increment(&self, id: &ObjectId) -> RepositoryResult<CartItem> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == Some(*id))
            .ok_or_else(|| RepositoryError::not_found("Cart item not found"))?;
        item.quantity += 1;
        Ok(item.clone())
    }

    async fn decrement_or_remove(&self, id: &ObjectId) -> RepositoryResult<DecrementOutcome> {
        let mut items = self.items.lock().unwrap();
        let pos = items
            .iter()
            .position(|i| i.id == Some(*id))
            .ok_or_else(|| RepositoryError::not_found("Cart item not found"))?;
        if items[pos].quantity > 1 {
            items[pos].quantity -= 1;
            Ok(DecrementOutcome::Decremented(items[pos].clone()))
        } else {
            items.remove(pos);
            Ok(DecrementOutcome::Removed)
        }
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != Some(*id));
        if items.len() == before {
            return Err(RepositoryError::not_found("Cart item not found"));
        }
        Ok(())
    }
}

// ---------- orders ----------

/// Places orders against a shared cart mock so deletions are observable.
pub struct MockOrderRepository {
    pub cart: Arc<MockCartRepository>,
    pub orders: Mutex<Vec<Order>>,
    pub monthly: Mutex<Vec<MonthlySales>>,
    pub categories: Mutex<Vec<CategorySales>>,
}

impl MockOrderRepository {
    pub fn new(cart: Arc<MockCartRepository>) -> Self {
        MockOrderRepository {
            cart,
            orders: Mutex::new(Vec::new()),
            monthly: Mutex::new(Vec::new()),
            categories: Mutex::new(Vec::new()),
        }
    }
}

fn summary_of(order: &Order) -> Option<OrderSummary> {
    Some(OrderSummary {
        id: order.id?,
        status: order.status,
        created_at: order.created_at,
        grand_total: order.grand_total,
        items: order.items.clone(),
    })
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn place_order(&self, mut order: Order, cart_items: &[CartItem]) -> RepositoryResult<Order> {
        {
            let mut items = self.cart.items.lock().unwrap();
            let unchanged = cart_items
                .iter()
                .filter(|snap| items.iter().any(|i| i.id == snap.id && i.quantity == snap.quantity))
                .count();
            if unchanged != cart_items.len() {
                return Err(RepositoryError::conflict("Cart changed while placing the order"));
            }
            items.retain(|i| !cart_items.iter().any(|snap| snap.id == i.id));
        }
        order.id = Some(ObjectId::new());
        order.created_at = Some(bson::DateTime::now());
        order.updated_at = order.created_at;
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn list_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Order>> {
        let mut orders: Vec<Order> =
            self.orders.lock().unwrap().iter().filter(|o| o.user_id == *user_id).cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_summaries(&self) -> RepositoryResult<Vec<OrderSummary>> {
        let mut summaries: Vec<OrderSummary> = self.orders.lock().unwrap().iter().filter_map(summary_of).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn update_status(&self, id: &ObjectId, status: OrderStatus) -> RepositoryResult<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        Ok(orders.iter_mut().find(|o| o.id == Some(*id)).map(|o| {
            o.status = status;
            o.clone()
        }))
    }

    async fn sales_by_month(&self) -> RepositoryResult<Vec<MonthlySales>> {
        Ok(self.monthly.lock().unwrap().clone())
    }

    async fn sales_by_category(&self) -> RepositoryResult<Vec<CategorySales>> {
        Ok(self.categories.lock().unwrap().clone())
    }
}

// ---------- inventory ----------

#[derive(Default)]
pub struct MockInventoryRepository {
    pub items: Mutex<Vec<InventoryItem>>,
}

#[async_trait]
impl InventoryRepository for MockInventoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<InventoryItem>> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<InventoryItem>> {
        Ok(self.items.lock().unwrap().iter().find(|i| i.id == Some(*id)).cloned())
    }

    async fn insert(&self, mut item: InventoryItem) -> RepositoryResult<InventoryItem> {
        item.id = Some(ObjectId::new());
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &ObjectId, mut item: InventoryItem) -> RepositoryResult<Option<InventoryItem>> {
        let mut items = self.items.lock().unwrap();
        let Some(slot) = items.iter_mut().find(|i| i.id == Some(*id)) else {
            return Ok(None);
        };
        item.id = Some(*id);
        *slot = item.clone();
        Ok(Some(item))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != Some(*id));
        if items.len() == before {
            return Err(RepositoryError::not_found("Inventory item not found"));
        }
        Ok(())
    }
}

// ---------- purchases ----------

#[derive(Default)]
pub struct MockPurchaseRepository {
    pub purchases: Mutex<Vec<Purchase>>,
}

impl MockPurchaseRepository {
    /// Stores a purchase with an explicit timestamp.
    pub fn seed(&self, mut purchase: Purchase, at: chrono::DateTime<chrono::Utc>) {
        purchase.id = Some(ObjectId::new());
        purchase.created_at = Some(bson::DateTime::from_chrono(at));
        self.purchases.lock().unwrap().push(purchase);
    }
}

#[async_trait]
impl PurchaseRepository for MockPurchaseRepository {
    async fn insert(&self, mut purchase: Purchase) -> RepositoryResult<Purchase> {
        purchase.id = Some(ObjectId::new());
        purchase.created_at = Some(bson::DateTime::now());
        self.purchases.lock().unwrap().push(purchase.clone());
        Ok(purchase)
    }

    async fn list(&self) -> RepositoryResult<Vec<Purchase>> {
        let mut purchases = self.purchases.lock().unwrap().clone();
        purchases.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        Ok(purchases)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.purchases.lock().unwrap().len() as u64)
    }

    async fn list_between(&self, start: bson::DateTime, end: bson::DateTime) -> RepositoryResult<Vec<Purchase>> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.created_at.map_or(false, |at| at >= start && at < end))
            .cloned()
            .collect())
    }
}

// ---------- wiring ----------

pub fn jwt_utils() -> Arc<JwtTokenUtilsImpl> {
    Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()))
}

/// Mock-backed services plus handles on every store for assertions.
pub struct TestContext {
    pub users: Arc<MockUserRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub products: Arc<MockProductRepository>,
    pub cart: Arc<MockCartRepository>,
    pub orders: Arc<MockOrderRepository>,
    pub inventory: Arc<MockInventoryRepository>,
    pub purchases: Arc<MockPurchaseRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub services: Services,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let users = Arc::new(MockUserRepository::default());
        let mailer = Arc::new(mailer);
        let products = Arc::new(MockProductRepository::default());
        let cart = Arc::new(MockCartRepository::default());
        let orders = Arc::new(MockOrderRepository::new(cart.clone()));
        let inventory = Arc::new(MockInventoryRepository::default());
        let purchases = Arc::new(MockPurchaseRepository::default());
        let jwt_utils = jwt_utils();

        let services = Services {
            user: Arc::new(UserServiceImpl::new(
                users.clone(),
                jwt_utils.clone(),
                mailer.clone(),
                OtpConfig::from_test_env(),
            )),
            product: Arc::new(ProductServiceImpl::new(products.clone())),
            cart: Arc::new(CartServiceImpl::new(cart.clone())),
            order: Arc::new(OrderServiceImpl::new(orders.clone(), cart.clone())),
            report: Arc::new(ReportServiceImpl::new(orders.clone())),
            inventory: Arc::new(InventoryServiceImpl::new(inventory.clone())),
            purchase: Arc::new(PurchaseServiceImpl::new(purchases.clone())),
        };

        TestContext { users, mailer, products, cart, orders, inventory, purchases, jwt_utils, services }
    }
}

pub fn cart_item(user_id: ObjectId, name: &str, price: f64, quantity: i32) -> CartItem {
    CartItem {
        id: None,
        user_id,
        product_id: ObjectId::new(),
        name: name.to_string(),
        image: None,
        selected_size: "Medium".to_string(),
        addons: vec![],
        total_price: price,
        quantity,
        created_at: None,
    }
}
