//! Calendar labels shared by the sales reports and purchase statistics.

use chrono::{NaiveDate, Weekday};

/// Three-letter name of a 1-based month; out-of-range months yield `"?"`.
pub fn month_abbrev(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// `"Jan 2025"` style label.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("? {}", year))
}

/// Monday first
pub fn weekday_labels() -> Vec<String> {
    std::iter::successors(Some(Weekday::Mon), |d| Some(d.succ()))
        .take(7)
        .map(|d| d.to_string())
        .collect()
}
