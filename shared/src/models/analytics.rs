//! Dashboard analytics models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::BookingStatus;

/// Status list used when the dashboard filter is untouched
pub const DEFAULT_STATUS_FILTER: &str = "pending,confirmed,cancelled,completed";

/// Dashboard filter shared by the overview and the CSV export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Comma separated booking statuses
    pub status: String,
}

impl AnalyticsFilter {
    /// Default filter: open start, up to `today`, every status
    pub fn until(today: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(today),
            status: DEFAULT_STATUS_FILTER.to_string(),
        }
    }

    /// Same filter restricted to one status (e.g. the "cancelled" export)
    pub fn with_status(&self, status: BookingStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
            ..self.clone()
        }
    }

    /// Query string pairs; empty values are omitted
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.from {
            query.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        if !self.status.trim().is_empty() {
            query.push(("status", self.status.clone()));
        }
        query
    }
}

/// Headline numbers of the overview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    #[serde(alias = "totalRevenue")]
    pub total_sales: Decimal,
    pub total_bookings: u64,
    pub confirmed_bookings: u64,
    pub cancelled_bookings: u64,
}

/// One day on the sales/bookings chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesPoint {
    pub date: String,
    #[serde(alias = "revenue")]
    pub sales: Decimal,
    pub bookings: u64,
}

/// Best performing product in the window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopProduct {
    pub name: String,
    #[serde(alias = "revenue")]
    pub sales: Decimal,
    pub bookings: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Breakdowns {
    pub by_status: BTreeMap<String, u64>,
    pub top_products: Vec<TopProduct>,
}

/// `GET /admin/analytics/overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOverview {
    pub summary: AnalyticsSummary,
    pub series: Vec<SeriesPoint>,
    pub breakdowns: Breakdowns,
}

/// Pie chart slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSlice {
    pub name: String,
    pub value: u64,
}

impl AnalyticsOverview {
    /// Status pie, one slice per status key
    pub fn status_slices(&self) -> Vec<StatusSlice> {
        self.breakdowns
            .by_status
            .iter()
            .map(|(name, value)| StatusSlice {
                name: name.clone(),
                value: *value,
            })
            .collect()
    }
}

/// Simple entity counts shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub products: u64,
    pub bookings: u64,
    pub members: u64,
}
