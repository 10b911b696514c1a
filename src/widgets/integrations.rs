//! Integration health widget.

use crate::api::DashboardApi;
use crate::consts::cli_consts::endpoints;
use crate::events::{EventSender, Source};
use crate::polling::{
    DataSource, DisplayState, FallbackPolicy, FetchFailure, Fetcher, PollingController,
    PollingError, PollingHandle, WidgetPhase, WidgetState,
};
use crate::status::{ConnectionState, StatusSummary, SubStatus, aggregate, summarize};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Name of the entry standing in for the status endpoint itself.
pub const STATUS_ENDPOINT_ENTRY: &str = "status-endpoint";

pub struct IntegrationStatusFetcher {
    api: Arc<dyn DashboardApi>,
}

impl IntegrationStatusFetcher {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Fetcher<Vec<SubStatus>> for IntegrationStatusFetcher {
    async fn fetch(&self) -> Result<Vec<SubStatus>, FetchFailure> {
        self.api
            .integration_status()
            .await
            .map_err(|e| super::into_failure(Source::IntegrationStatus, e))
    }
}

/// Sub-statuses to aggregate for a given widget state.
///
/// Before any result the endpoint counts as loading. While the latest fetch is
/// failing, the endpoint itself is reported as an error next to the last known
/// integration states.
pub fn derive_sub_statuses(state: &WidgetState<Vec<SubStatus>>) -> Vec<SubStatus> {
    let display = &state.display;
    let mut sub_statuses = display.value.clone();
    match &display.error {
        Some(error) => sub_statuses.push(
            SubStatus::new(STATUS_ENDPOINT_ENTRY, ConnectionState::Error)
                .with_detail("kind", error.kind.to_string())
                .with_detail("message", error.message.clone()),
        ),
        None if !display.has_data() => sub_statuses.push(SubStatus::loading(STATUS_ENDPOINT_ENTRY)),
        None => {}
    }
    sub_statuses
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationPanelSnapshot {
    pub phase: WidgetPhase,
    pub overall: ConnectionState,
    pub summary: StatusSummary,
    pub sub_statuses: Vec<SubStatus>,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<FetchFailure>,
}

pub struct IntegrationStatusPanel {
    handle: PollingHandle<Vec<SubStatus>>,
}

impl IntegrationStatusPanel {
    pub fn activate(
        api: Arc<dyn DashboardApi>,
        interval: Duration,
        events: Option<EventSender>,
    ) -> Self {
        let source = DataSource::new(
            Source::IntegrationStatus,
            endpoints::INTEGRATION_STATUS,
            interval,
        );
        let mut controller = PollingController::new(
            source,
            Arc::new(IntegrationStatusFetcher::new(api)),
            FallbackPolicy::new(Vec::new()),
        );
        if let Some(events) = events {
            controller = controller.with_events(events);
        }
        Self {
            handle: controller.activate(),
        }
    }

    pub fn handle(&self) -> &PollingHandle<Vec<SubStatus>> {
        &self.handle
    }

    pub fn sub_statuses(&self) -> Vec<SubStatus> {
        derive_sub_statuses(&self.handle.state())
    }

    pub fn overall(&self) -> ConnectionState {
        aggregate(&self.sub_statuses())
    }

    pub async fn refresh(&self) -> Result<DisplayState<Vec<SubStatus>>, PollingError> {
        self.handle.refresh().await
    }

    pub fn snapshot(&self) -> IntegrationPanelSnapshot {
        let state = self.handle.state();
        let sub_statuses = derive_sub_statuses(&state);
        let summary = summarize(&sub_statuses);
        IntegrationPanelSnapshot {
            phase: state.phase,
            overall: summary.overall,
            summary,
            sub_statuses,
            last_updated: state.display.last_updated,
            error: state.display.error,
        }
    }

    pub async fn shutdown(self) {
        self.handle.shutdown().await;
    }
}
