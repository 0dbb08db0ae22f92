use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::purchase_dto::{CountResponse, PurchaseResponse, RecordPurchaseRequest, StatsQuery};
use crate::handler::validate;
use crate::model::purchase::PurchaseItem;
use crate::service::purchase_service::{PurchaseService, PurchaseServiceImpl};
use crate::util::error::HandlerError;

pub async fn record_purchase_handler(
    State(service): State<Arc<PurchaseServiceImpl>>,
    Json(payload): Json<RecordPurchaseRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let items = payload.items.into_iter().map(PurchaseItem::from).collect();
    let created = service.record(items, payload.payment_method).await?;
    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(created))))
}

pub async fn list_purchases_handler(
    State(service): State<Arc<PurchaseServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let purchases = service.list().await?;
    Ok(Json(purchases.into_iter().map(PurchaseResponse::from).collect::<Vec<_>>()))
}

pub async fn count_purchases_handler(
    State(service): State<Arc<PurchaseServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(CountResponse { count: service.count().await? }))
}

pub async fn purchase_stats_handler(
    State(service): State<Arc<PurchaseServiceImpl>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.stats(query.range, query.date).await?))
}
