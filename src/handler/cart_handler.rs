use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::cart_dto::{AddToCartRequest, CartItemResponse, DecrementResponse};
use crate::dto::MessageResponse;
use crate::handler::{parse_object_id, validate};
use crate::model::cart::{CartItem, DecrementOutcome};
use crate::service::cart_service::{CartService, CartServiceImpl};
use crate::util::error::HandlerError;

pub async fn add_to_cart_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let item = CartItem {
        id: None,
        user_id: parse_object_id(&payload.user_id)?,
        product_id: parse_object_id(&payload.product_id)?,
        name: payload.name,
        image: payload.image,
        selected_size: payload.selected_size,
        addons: payload.addons,
        total_price: payload.total_price,
        quantity: payload.quantity,
        created_at: None,
    };
    let created = service.add_to_cart(item).await?;
    Ok((StatusCode::CREATED, Json(CartItemResponse::from(created))))
}

pub async fn list_cart_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let items = service.list_cart(parse_object_id(&user_id)?).await?;
    Ok(Json(items.into_iter().map(CartItemResponse::from).collect::<Vec<_>>()))
}

pub async fn increment_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let item = service.increment_quantity(parse_object_id(&id)?).await?;
    Ok(Json(CartItemResponse::from(item)))
}

pub async fn decrement_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let response = match service.decrement_quantity(parse_object_id(&id)?).await? {
        DecrementOutcome::Decremented(item) => DecrementResponse {
            message: "Quantity decreased".to_string(),
            item: Some(CartItemResponse::from(item)),
        },
        DecrementOutcome::Removed => DecrementResponse {
            message: "Item removed from cart".to_string(),
            item: None,
        },
    };
    Ok(Json(response))
}

pub async fn remove_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.remove_item(parse_object_id(&id)?).await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}
