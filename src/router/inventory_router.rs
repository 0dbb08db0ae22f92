use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::handler::inventory_handler::{
    create_inventory_handler, delete_inventory_handler, get_inventory_handler, list_inventory_handler,
    update_inventory_handler,
};
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};
use crate::service::inventory_service::InventoryServiceImpl;

pub fn inventory_router(service: Arc<InventoryServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .route("/inventory", get(list_inventory_handler).post(create_inventory_handler))
        .route(
            "/inventory/{id}",
            get(get_inventory_handler).put(update_inventory_handler).delete(delete_inventory_handler),
        )
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
