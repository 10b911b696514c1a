//! KPI metrics widget over a user-chosen reporting window.

use crate::api::DashboardApi;
use crate::consts::cli_consts::endpoints;
use crate::events::{EventSender, Source};
use crate::models::{DateRange, KpiReport};
use crate::polling::{
    DataSource, DisplayState, FallbackPolicy, FetchFailure, Fetcher, PollingController,
    PollingError, PollingHandle, WidgetPhase,
};
use log::debug;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct MetricsFetcher {
    api: Arc<dyn DashboardApi>,
    range: Arc<RwLock<DateRange>>,
    /// Range of the most recently started fetch.
    issued: Arc<RwLock<Option<DateRange>>>,
}

impl MetricsFetcher {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        range: Arc<RwLock<DateRange>>,
        issued: Arc<RwLock<Option<DateRange>>>,
    ) -> Self {
        Self { api, range, issued }
    }
}

#[async_trait::async_trait]
impl Fetcher<KpiReport> for MetricsFetcher {
    async fn fetch(&self) -> Result<KpiReport, FetchFailure> {
        let range = *self.range.read().await;
        *self.issued.write().await = Some(range);
        let mut report = self
            .api
            .kpi_report(&range)
            .await
            .map_err(|e| super::into_failure(Source::Metrics, e))?;
        report.range = Some(range);
        Ok(report)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPanelSnapshot {
    pub phase: WidgetPhase,
    pub range: DateRange,
    pub display: DisplayState<KpiReport>,
}

pub struct MetricsPanel {
    handle: PollingHandle<KpiReport>,
    range: Arc<RwLock<DateRange>>,
    issued: Arc<RwLock<Option<DateRange>>>,
}

impl MetricsPanel {
    pub fn activate(
        api: Arc<dyn DashboardApi>,
        range: DateRange,
        interval: Duration,
        events: Option<EventSender>,
    ) -> Self {
        let range = Arc::new(RwLock::new(range));
        let issued = Arc::new(RwLock::new(None));
        let source = DataSource::new(Source::Metrics, endpoints::DASHBOARD_METRICS, interval);
        let mut controller = PollingController::new(
            source,
            Arc::new(MetricsFetcher::new(
                api,
                Arc::clone(&range),
                Arc::clone(&issued),
            )),
            FallbackPolicy::new(KpiReport::default()),
        );
        if let Some(events) = events {
            controller = controller.with_events(events);
        }
        Self {
            handle: controller.activate(),
            range,
            issued,
        }
    }

    pub fn handle(&self) -> &PollingHandle<KpiReport> {
        &self.handle
    }

    pub async fn range(&self) -> DateRange {
        *self.range.read().await
    }

    /// Switch the reporting window and fetch it right away.
    ///
    /// A fetch already in flight was issued for the old window; when the refresh
    /// joins such a fetch, successful or not, one more is requested for the new window.
    pub async fn set_range(
        &self,
        range: DateRange,
    ) -> Result<DisplayState<KpiReport>, PollingError> {
        *self.range.write().await = range;
        let display = self.handle.refresh().await?;
        if *self.issued.read().await != Some(range) {
            debug!("Metrics refresh joined a fetch for the previous window, fetching {}", range);
            return self.handle.refresh().await;
        }
        Ok(display)
    }

    pub async fn refresh(&self) -> Result<DisplayState<KpiReport>, PollingError> {
        self.handle.refresh().await
    }

    pub async fn snapshot(&self) -> MetricsPanelSnapshot {
        let state = self.handle.state();
        MetricsPanelSnapshot {
            phase: state.phase,
            range: self.range().await,
            display: state.display,
        }
    }

    pub async fn shutdown(self) {
        self.handle.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::error::ApiError;
    use crate::models::{Cashier, Kpi};
    use crate::status::SubStatus;
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use std::sync::Mutex;

    /// Takes two seconds per report and rejects every window except `accepted`.
    struct SlowBackend {
        accepted: DateRange,
        requested: Mutex<Vec<DateRange>>,
    }

    #[async_trait::async_trait]
    impl DashboardApi for SlowBackend {
        fn base_url(&self) -> String {
            "http://slow".to_string()
        }

        async fn list_cashiers(&self) -> Result<Vec<Cashier>, ApiError> {
            Ok(Vec::new())
        }

        async fn integration_status(&self) -> Result<Vec<SubStatus>, ApiError> {
            Ok(Vec::new())
        }

        async fn kpi_report(&self, range: &DateRange) -> Result<KpiReport, ApiError> {
            self.requested.lock().unwrap().push(*range);
            tokio::time::sleep(Duration::from_secs(2)).await;
            if *range == self.accepted {
                Ok(report(20.0))
            } else {
                Err(ApiError::Http {
                    status: 500,
                    message: "report failed".to_string(),
                })
            }
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn report(sales: f64) -> KpiReport {
        KpiReport {
            range: None,
            kpis: vec![Kpi {
                name: "totalSales".to_string(),
                value: sales,
                change_pct: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_fetches_use_the_current_range() {
        let may = DateRange::new(date(1), date(31)).unwrap();
        let first_week = DateRange::new(date(1), date(7)).unwrap();

        let mut api = MockDashboardApi::new();
        api.expect_kpi_report()
            .with(eq(may))
            .times(1)
            .returning(|_| Ok(report(100.0)));
        api.expect_kpi_report()
            .with(eq(first_week))
            .times(1)
            .returning(|_| Ok(report(20.0)));

        let panel = MetricsPanel::activate(Arc::new(api), may, Duration::ZERO, None);
        let display = panel.handle().loaded().await.unwrap();
        assert_eq!(display.value.range, Some(may));

        let display = panel.set_range(first_week).await.unwrap();
        assert_eq!(display.value.range, Some(first_week));
        assert_eq!(display.value.get("totalSales").unwrap().value, 20.0);

        let snapshot = panel.snapshot().await;
        assert_eq!(snapshot.range, first_week);
        panel.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_range_is_fetched_when_joined_fetch_fails() {
        let may = DateRange::new(date(1), date(31)).unwrap();
        let first_week = DateRange::new(date(1), date(7)).unwrap();
        let backend = Arc::new(SlowBackend {
            accepted: first_week,
            requested: Mutex::new(Vec::new()),
        });

        let panel = MetricsPanel::activate(backend.clone(), may, Duration::ZERO, None);
        // The initial fetch for May is still in flight
        tokio::time::sleep(Duration::from_millis(500)).await;

        let display = panel.set_range(first_week).await.unwrap();
        assert!(display.error.is_none());
        assert_eq!(display.value.range, Some(first_week));
        assert_eq!(*backend.requested.lock().unwrap(), vec![may, first_week]);
        panel.shutdown().await;
    }

    #[tokio::test]
    async fn test_fallback_report_is_empty_before_first_success() {
        let range = DateRange::new(date(1), date(2)).unwrap();
        let mut api = MockDashboardApi::new();
        api.expect_kpi_report().returning(|_| {
            Err(crate::api::error::ApiError::Http {
                status: 401,
                message: "expired".to_string(),
            })
        });

        let panel = MetricsPanel::activate(Arc::new(api), range, Duration::ZERO, None);
        let display = panel.handle().loaded().await.unwrap();
        assert!(display.value.is_empty());
        assert!(display.needs_retry());
        panel.shutdown().await;
    }
}
