use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::app_conf::AppConfig;
use crate::config::{EmailConfig, JwtConfig, MongoConfig, OtpConfig};
use crate::middlewares::admin_middleware::AdminAuthState;
use crate::repository::cart_repo::MongoCartRepository;
use crate::repository::inventory_repo::MongoInventoryRepository;
use crate::repository::mongo::MongoStore;
use crate::repository::order_repo::MongoOrderRepository;
use crate::repository::product_repo::MongoProductRepository;
use crate::repository::purchase_repo::MongoPurchaseRepository;
use crate::repository::user_repo::MongoUserRepository;
use crate::router::cart_router::cart_router;
use crate::router::inventory_router::inventory_router;
use crate::router::order_router::{order_router, report_router};
use crate::router::product_router::product_router;
use crate::router::purchase_router::purchase_router;
use crate::router::user_router::user_router;
use crate::service::cart_service::CartServiceImpl;
use crate::service::inventory_service::InventoryServiceImpl;
use crate::service::order_service::OrderServiceImpl;
use crate::service::product_service::ProductServiceImpl;
use crate::service::purchase_service::PurchaseServiceImpl;
use crate::service::report_service::ReportServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::email::SmtpEmailService;
use crate::util::jwt::JwtTokenUtilsImpl;

/// Every service the HTTP layer dispatches to.
#[derive(Clone)]
pub struct Services {
    pub user: Arc<UserServiceImpl>,
    pub product: Arc<ProductServiceImpl>,
    pub cart: Arc<CartServiceImpl>,
    pub order: Arc<OrderServiceImpl>,
    pub report: Arc<ReportServiceImpl>,
    pub inventory: Arc<InventoryServiceImpl>,
    pub purchase: Arc<PurchaseServiceImpl>,
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn Error>> {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let otp_config = OtpConfig::from_env()?;
        let email_config = EmailConfig::from_env()?;

        let store = MongoStore::connect(&mongo_config).await?;
        let db = &store.database;

        let user_repo = Arc::new(MongoUserRepository::new(db));
        if let Err(e) = user_repo.ensure_indexes().await {
            // duplicate signups are still caught by the service lookup
            warn!("Could not create user indexes: {e}");
        }
        let cart_repo = Arc::new(MongoCartRepository::new(db));
        let order_repo = Arc::new(MongoOrderRepository::new(store.client.clone(), db));

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let mailer = Arc::new(SmtpEmailService::new(email_config)?);

        let services = Services {
            user: Arc::new(UserServiceImpl::new(user_repo, jwt_utils.clone(), mailer, otp_config)),
            product: Arc::new(ProductServiceImpl::new(Arc::new(MongoProductRepository::new(db)))),
            cart: Arc::new(CartServiceImpl::new(cart_repo.clone())),
            order: Arc::new(OrderServiceImpl::new(order_repo.clone(), cart_repo)),
            report: Arc::new(ReportServiceImpl::new(order_repo)),
            inventory: Arc::new(InventoryServiceImpl::new(Arc::new(MongoInventoryRepository::new(db)))),
            purchase: Arc::new(PurchaseServiceImpl::new(Arc::new(MongoPurchaseRepository::new(db)))),
        };

        Self::create_first_admin_user(&services.user).await;
        let router = build_router(services, jwt_utils);
        Ok(App { config, router })
    }

    pub async fn start(self) -> Result<(), Box<dyn Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }

    async fn create_first_admin_user(user_service: &UserServiceImpl) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };
        if let Err(e) = user_service.ensure_admin(&admin_conf).await {
            error!("Failed to create admin user: {e}");
        }
    }
}

/// All `/api` routes plus `/health`.
pub fn build_router(services: Services, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Router {
    let admin_auth_state = Arc::new(AdminAuthState::new(jwt_utils));

    let api = Router::new()
        .merge(user_router(services.user))
        .merge(product_router(services.product, admin_auth_state.clone()))
        .merge(cart_router(services.cart))
        .merge(order_router(services.order, admin_auth_state.clone()))
        .merge(report_router(services.report, admin_auth_state.clone()))
        .merge(inventory_router(services.inventory, admin_auth_state.clone()))
        .merge(purchase_router(services.purchase, admin_auth_state));

    Router::new()
        .nest("/api", api)
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
}
