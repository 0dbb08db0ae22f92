use serde::{Deserialize, Serialize};

use crate::util::date::month_label;

/// One `(year, month)` bucket of completed-order revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySales {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub data: Vec<f64>,
}

/// Chart payload consumed by the dashboard: `{labels, datasets: [{data}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Single-point placeholder returned instead of an empty series.
    pub fn no_data() -> Self {
        ChartData {
            labels: vec!["No Data".to_string()],
            datasets: vec![Dataset { data: vec![0.0] }],
        }
    }

    fn from_points(points: impl Iterator<Item = (String, f64)>) -> Self {
        let (labels, data): (Vec<String>, Vec<f64>) = points.unzip();
        if labels.is_empty() {
            return Self::no_data();
        }
        ChartData { labels, datasets: vec![Dataset { data }] }
    }

    /// Rows must already be in chronological order.
    pub fn from_monthly(rows: &[MonthlySales]) -> Self {
        Self::from_points(rows.iter().map(|r| (month_label(r.year, r.month), r.total)))
    }

    pub fn from_categories(rows: &[CategorySales]) -> Self {
        Self::from_points(rows.iter().map(|r| (r.category.clone(), r.total)))
    }
}
