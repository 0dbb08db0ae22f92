use bson::oid::ObjectId;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::util::date::{month_abbrev, weekday_labels};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity: i32,
    /// Unit price
    pub price: f64,
}

/// A point-of-sale record entered from the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub items: Vec<PurchaseItem>,
    pub total: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
}

impl Purchase {
    pub fn new(items: Vec<PurchaseItem>, payment_method: Option<String>) -> Self {
        let total = items.iter().map(|i| i.price * f64::from(i.quantity)).sum();
        Purchase {
            id: None,
            items,
            total,
            payment_method,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    Day,
    Week,
    Month,
    Year,
}

impl std::str::FromStr for StatsRange {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(StatsRange::Day),
            "week" => Ok(StatsRange::Week),
            "month" => Ok(StatsRange::Month),
            "year" => Ok(StatsRange::Year),
            _ => Err(()),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

impl StatsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::Day => "day",
            StatsRange::Week => "week",
            StatsRange::Month => "month",
            StatsRange::Year => "year",
        }
    }

    /// Half-open `[start, end)` window containing `date`. Weeks start on Monday.
    pub fn window(&self, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = match self {
            StatsRange::Day => (date, date.succ_opt()?),
            StatsRange::Week => {
                let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                (start, start + Duration::days(7))
            }
            StatsRange::Month => {
                let start = date.with_day(1)?;
                (start, first_of_next_month(start)?)
            }
            StatsRange::Year => (
                NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?,
            ),
        };
        Some((midnight(start), midnight(end)))
    }

    /// Chart labels for the window that starts at `start`.
    pub fn labels(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<String> {
        match self {
            StatsRange::Day => (0..24).map(|h| format!("{:02}:00", h)).collect(),
            StatsRange::Week => weekday_labels(),
            StatsRange::Month => {
                let days = (end - start).num_days();
                (1..=days).map(|d| d.to_string()).collect()
            }
            StatsRange::Year => (1..=12).map(month_abbrev).collect(),
        }
    }

    /// Bucket index of `at` inside the window starting at `start`.
    pub fn bucket(&self, start: DateTime<Utc>, at: DateTime<Utc>) -> usize {
        match self {
            StatsRange::Day => at.hour() as usize,
            StatsRange::Week | StatsRange::Month => (at - start).num_days().max(0) as usize,
            StatsRange::Year => at.month0() as usize,
        }
    }
}
