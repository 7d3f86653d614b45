//! Dashboard page: entity counts, analytics overview, CSV export

use chrono::NaiveDate;
use shared::models::{AnalyticsFilter, AnalyticsOverview, BookingStatus, DashboardStats, StatusSlice};
use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::api::AdminApi;

pub struct DashboardPage {
    api: AdminApi,
    pub filter: AnalyticsFilter,
    pub overview: Option<AnalyticsOverview>,
    pub stats: Option<DashboardStats>,
    pub error: Option<String>,
}

impl DashboardPage {
    /// Default filter: everything up to `today`
    pub fn new(api: AdminApi, today: NaiveDate) -> Self {
        Self {
            api,
            filter: AnalyticsFilter::until(today),
            overview: None,
            stats: None,
            error: None,
        }
    }

    fn track<R>(&mut self, result: ClientResult<R>) -> ClientResult<R> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.banner()),
        }
        result
    }

    /// Load the overview for the current filter
    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.api.analytics_overview(&self.filter).await;
        self.overview = Some(self.track(result)?);
        Ok(())
    }

    pub async fn load_stats(&mut self) -> ClientResult<()> {
        let result = self.api.fetch_stats().await;
        self.stats = Some(self.track(result)?);
        Ok(())
    }

    pub fn status_slices(&self) -> Vec<StatusSlice> {
        self.overview
            .as_ref()
            .map(AnalyticsOverview::status_slices)
            .unwrap_or_default()
    }

    /// Save the CSV report for the current filter, optionally narrowed to one status
    pub async fn export(
        &mut self,
        status: Option<BookingStatus>,
        dir: &Path,
        today: NaiveDate,
    ) -> ClientResult<PathBuf> {
        let filter = match status {
            Some(status) => self.filter.with_status(status),
            None => self.filter.clone(),
        };
        let result = self.api.save_booking_report(&filter, dir, today).await;
        self.track(result)
    }
}
