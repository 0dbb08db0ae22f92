use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::model::report::ChartData;
use crate::repository::order_repo::OrderRepository;
use crate::util::error::ServiceError;

/// Revenue charts over `Completed` orders only.
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn sales_by_month(&self) -> Result<ChartData, ServiceError>;
    async fn sales_by_category(&self) -> Result<ChartData, ServiceError>;
}

pub struct ReportServiceImpl {
    pub order_repo: Arc<dyn OrderRepository>,
}

impl ReportServiceImpl {
    pub fn new(order_repo: Arc<dyn OrderRepository>) -> Self {
        Self { order_repo }
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    #[instrument(skip(self))]
    async fn sales_by_month(&self) -> Result<ChartData, ServiceError> {
        let rows = self.order_repo.sales_by_month().await?;
        debug!("{} monthly buckets", rows.len());
        Ok(ChartData::from_monthly(&rows))
    }

    #[instrument(skip(self))]
    async fn sales_by_category(&self) -> Result<ChartData, ServiceError> {
        let rows = self.order_repo.sales_by_category().await?;
        debug!("{} categories", rows.len());
        Ok(ChartData::from_categories(&rows))
    }
}
