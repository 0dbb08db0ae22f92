use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::inventory_dto::{InventoryRequest, InventoryResponse};
use crate::dto::MessageResponse;
use crate::handler::{parse_object_id, validate};
use crate::service::inventory_service::{InventoryService, InventoryServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_inventory_handler(
    State(service): State<Arc<InventoryServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let items = service.list().await?;
    Ok(Json(items.into_iter().map(InventoryResponse::from).collect::<Vec<_>>()))
}

pub async fn get_inventory_handler(
    State(service): State<Arc<InventoryServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let item = service.get(parse_object_id(&id)?).await?;
    Ok(Json(InventoryResponse::from(item)))
}

pub async fn create_inventory_handler(
    State(service): State<Arc<InventoryServiceImpl>>,
    Json(payload): Json<InventoryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let created = service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(InventoryResponse::from(created))))
}

pub async fn update_inventory_handler(
    State(service): State<Arc<InventoryServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<InventoryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id)?;
    validate(&payload)?;
    let updated = service.update(id, payload.into()).await?;
    Ok(Json(InventoryResponse::from(updated)))
}

pub async fn delete_inventory_handler(
    State(service): State<Arc<InventoryServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete(parse_object_id(&id)?).await?;
    Ok(Json(MessageResponse::new("Inventory item deleted")))
}
