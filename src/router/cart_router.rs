use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handler::cart_handler::{
    add_to_cart_handler, decrement_handler, increment_handler, list_cart_handler, remove_handler,
};
use crate::service::cart_service::CartServiceImpl;

pub fn cart_router(service: Arc<CartServiceImpl>) -> Router {
    Router::new()
        .route("/cart/add", post(add_to_cart_handler))
        .route("/cart/{id}", get(list_cart_handler))
        .route("/cart/increment/{id}", patch(increment_handler))
        .route("/cart/decrement/{id}", patch(decrement_handler))
        .route("/cart/remove/{id}", delete(remove_handler))
        .with_state(service)
}
