use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::product_dto::{ProductRequest, ProductResponse};
use crate::dto::MessageResponse;
use crate::handler::{parse_object_id, validate};
use crate::service::product_service::{ProductService, ProductServiceImpl};
use crate::util::error::HandlerError;

pub async fn fetch_products_handler(
    State(service): State<Arc<ProductServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let products = service.list_products().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect::<Vec<_>>()))
}

pub async fn add_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Json(payload): Json<ProductRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let created = service.add_product(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(created))))
}

pub async fn update_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<ProductRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id)?;
    validate(&payload)?;
    let updated = service.update_product(id, payload.into()).await?;
    Ok(Json(ProductResponse::from(updated)))
}

pub async fn delete_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete_product(parse_object_id(&id)?).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
