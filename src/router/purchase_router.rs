use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::handler::purchase_handler::{
    count_purchases_handler, list_purchases_handler, purchase_stats_handler, record_purchase_handler,
};
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};
use crate::service::purchase_service::PurchaseServiceImpl;

pub fn purchase_router(service: Arc<PurchaseServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .route("/purchase", get(list_purchases_handler).post(record_purchase_handler))
        .route("/purchase/count", get(count_purchases_handler))
        .route("/purchase/stats", get(purchase_stats_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
