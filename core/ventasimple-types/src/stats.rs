//! Sales statistics and the shaping applied before charting.

use crate::de;
use crate::Error;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range used by every `/stats` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range from explicit bounds.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The `days` days ending at `today`.
    #[must_use]
    pub fn last_days(days: u64, today: NaiveDate) -> Self {
        let from = today.checked_sub_days(Days::new(days)).unwrap_or(today);
        Self { from, to: today }
    }

    /// The default dashboard range: the last 30 days.
    #[must_use]
    pub fn last_30_days() -> Self {
        Self::last_days(30, Utc::now().date_naive())
    }

    /// Parses `YYYY-MM-DD` bounds.
    pub fn parse(from: &str, to: &str) -> crate::Result<Self> {
        Ok(Self {
            from: NaiveDate::parse_from_str(from.trim(), DATE_FORMAT)?,
            to: NaiveDate::parse_from_str(to.trim(), DATE_FORMAT)?,
        })
    }

    /// Query-string pairs, in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("from", self.from.format(DATE_FORMAT).to_string()),
            ("to", self.to.format(DATE_FORMAT).to_string()),
        ]
    }
}

/// Bucket size of the sales time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    #[default]
    Day,
    Week,
    Month,
}

impl Bucket {
    /// Wire name of the bucket.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(Error::InvalidValue {
                kind: "bucket",
                value: s.to_string(),
            }),
        }
    }
}

/// `GET /stats/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub sales_amount: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub sales_count: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub avg_ticket: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub items_count: Option<u64>,
}

/// Entry of `GET /stats/top-products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub qty: Option<f64>,
}

/// Entry of `GET /stats/category-leaders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryLeader {
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub qty: Option<f64>,
}

/// One point of the sales time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Start of the bucket.
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub ts: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub tickets: Option<u64>,
}

/// `GET /stats/sales-series`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSeries {
    #[serde(default, deserialize_with = "de::lenient_list")]
    pub data: Vec<SeriesPoint>,
}

impl SalesSeries {
    /// Sum of amount and tickets over every bucket.
    #[must_use]
    pub fn totals(&self) -> (f64, u64) {
        self.data.iter().fold((0.0, 0), |(amount, tickets), p| {
            (
                amount + p.amount.unwrap_or(0.0),
                tickets + p.tickets.unwrap_or(0),
            )
        })
    }
}

/// A category's share of units sold, ready for a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: f64,
    /// Fraction of the total, `0.0..=1.0`.
    pub share: f64,
}

/// Maps category leaders to pie slices. Shares are zero when nothing sold.
#[must_use]
pub fn category_shares(leaders: &[CategoryLeader]) -> Vec<CategorySlice> {
    let total: f64 = leaders.iter().filter_map(|l| l.qty).sum();
    leaders
        .iter()
        .map(|l| {
            let value = l.qty.unwrap_or(0.0);
            CategorySlice {
                name: l.category.clone(),
                value,
                share: if total > 0.0 { value / total } else { 0.0 },
            }
        })
        .collect()
}
