use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::product_handler::{
    add_product_handler, delete_product_handler, fetch_products_handler, update_product_handler,
};
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};
use crate::service::product_service::ProductServiceImpl;

pub fn product_router(service: Arc<ProductServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    let public = Router::new().route("/product/fetch", get(fetch_products_handler));

    let admin = Router::new()
        .route("/product/add", post(add_product_handler))
        .route("/product/{id}", put(update_product_handler).delete(delete_product_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public.merge(admin).with_state(service)
}
