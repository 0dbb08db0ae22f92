use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bson::oid::ObjectId;
use tracing::debug;

use crate::dto::order_dto::{
    CreateOrderRequest, OrderEnvelope, OrderResponse, OrderSummaryResponse, UpdateOrderStatusRequest,
};
use crate::handler::{parse_object_id, validate};
use crate::model::order::OrderStatus;
use crate::service::order_service::{OrderService, OrderServiceImpl};
use crate::service::report_service::{ReportService, ReportServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_order_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let user_id = parse_object_id(&payload.user_id)?;
    // malformed entries are skipped, not rejected
    let ids: Vec<ObjectId> = payload
        .cart_item_ids
        .iter()
        .filter_map(|raw| ObjectId::parse_str(raw.trim()).ok())
        .collect();
    debug!(requested = payload.cart_item_ids.len(), parsed = ids.len(), "Creating order");

    let order = service.create_order(user_id, ids).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderEnvelope { message: "Order created successfully".to_string(), order: OrderResponse::from(order) }),
    ))
}

pub async fn list_user_orders_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let orders = service.list_orders_for_user(parse_object_id(&user_id)?).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect::<Vec<_>>()))
}

pub async fn list_all_orders_handler(
    State(service): State<Arc<OrderServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let orders = service.list_all_orders().await?;
    Ok(Json(orders.into_iter().map(OrderSummaryResponse::from).collect::<Vec<_>>()))
}

pub async fn update_order_status_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id)?;
    validate(&payload)?;
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| HandlerError::bad_request(format!("Unknown order status '{}'", payload.status)))?;
    let order = service.update_order_status(id, status).await?;
    Ok(Json(OrderResponse::from(order)))
}

pub async fn sales_by_month_handler(
    State(service): State<Arc<ReportServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.sales_by_month().await?))
}

pub async fn sales_by_category_handler(
    State(service): State<Arc<ReportServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.sales_by_category().await?))
}
