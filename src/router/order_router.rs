use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::order_handler::{
    create_order_handler, list_all_orders_handler, list_user_orders_handler, sales_by_category_handler,
    sales_by_month_handler, update_order_status_handler,
};
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};
use crate::service::order_service::OrderServiceImpl;
use crate::service::report_service::ReportServiceImpl;

pub fn order_router(service: Arc<OrderServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    let public = Router::new()
        .route("/orders/create", post(create_order_handler))
        .route("/orders/{id}", get(list_user_orders_handler));

    let admin = Router::new()
        .route("/orders/all", get(list_all_orders_handler))
        .route("/orders/{id}/status", patch(update_order_status_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public.merge(admin).with_state(service)
}

/// Chart endpoints, all admin-only.
pub fn report_router(service: Arc<ReportServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .route("/orders/reports/sales-by-month", get(sales_by_month_handler))
        .route("/orders/reports/sales-by-category", get(sales_by_category_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
