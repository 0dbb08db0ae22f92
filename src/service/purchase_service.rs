use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::model::purchase::{Purchase, PurchaseItem, StatsRange};
use crate::repository::purchase_repo::PurchaseRepository;
use crate::util::error::ServiceError;

/// Bucketed sales for one calendar window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStats {
    pub range: StatsRange,
    pub start: String,
    pub end: String,
    pub total_sales: f64,
    pub total_purchases: u64,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

#[async_trait]
pub trait PurchaseService: Send + Sync {
    async fn record(&self, items: Vec<PurchaseItem>, payment_method: Option<String>) -> Result<Purchase, ServiceError>;
    async fn list(&self) -> Result<Vec<Purchase>, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    /// `range` defaults to `day`, `date` (YYYY-MM-DD) to today in UTC.
    async fn stats(&self, range: Option<String>, date: Option<String>) -> Result<PurchaseStats, ServiceError>;
}

pub struct PurchaseServiceImpl {
    pub purchase_repo: Arc<dyn PurchaseRepository>,
}

impl PurchaseServiceImpl {
    pub fn new(purchase_repo: Arc<dyn PurchaseRepository>) -> Self {
        Self { purchase_repo }
    }
}

fn parse_range(range: Option<&str>) -> Result<StatsRange, ServiceError> {
    match range.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(StatsRange::Day),
        Some(r) => r
            .parse()
            .map_err(|_| ServiceError::InvalidInput(format!("Unknown range '{}', expected day, week, month or year", r))),
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate, ServiceError> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(Utc::now().date_naive()),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", d))),
    }
}

#[async_trait]
impl PurchaseService for PurchaseServiceImpl {
    #[instrument(skip(self, items), fields(items = items.len()))]
    async fn record(&self, items: Vec<PurchaseItem>, payment_method: Option<String>) -> Result<Purchase, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::InvalidInput("A purchase needs at least one item".to_string()));
        }
        if let Some(bad) = items.iter().find(|i| i.quantity < 1 || !i.price.is_finite() || i.price < 0.0) {
            return Err(ServiceError::InvalidInput(format!("Invalid quantity or price for '{}'", bad.name)));
        }
        let created = self.purchase_repo.insert(Purchase::new(items, payment_method)).await?;
        info!(total = created.total, "Purchase recorded");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Purchase>, ServiceError> {
        Ok(self.purchase_repo.list().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.purchase_repo.count().await?)
    }

    #[instrument(skip(self))]
    async fn stats(&self, range: Option<String>, date: Option<String>) -> Result<PurchaseStats, ServiceError> {
        let range = parse_range(range.as_deref())?;
        let date = parse_date(date.as_deref())?;
        let (start, end) = range
            .window(date)
            .ok_or_else(|| ServiceError::InvalidInput("Date out of supported range".to_string()))?;

        let purchases = self
            .purchase_repo
            .list_between(bson::DateTime::from_chrono(start), bson::DateTime::from_chrono(end))
            .await?;

        let labels = range.labels(start, end);
        let mut data = vec![0.0; labels.len()];
        let mut total_sales = 0.0;
        for purchase in &purchases {
            total_sales += purchase.total;
            if let Some(created) = purchase.created_at {
                if let Some(slot) = data.get_mut(range.bucket(start, created.to_chrono())) {
                    *slot += purchase.total;
                }
            }
        }
        debug!(purchases = purchases.len(), "Purchase stats computed");

        Ok(PurchaseStats {
            range,
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
            total_sales,
            total_purchases: purchases.len() as u64,
            labels,
            data,
        })
    }
}
