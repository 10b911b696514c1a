//! Cashier roster widget with row selection.

use crate::api::DashboardApi;
use crate::consts::cli_consts::endpoints;
use crate::events::{EventSender, Source};
use crate::models::Cashier;
use crate::polling::{
    DataSource, DisplayState, FallbackPolicy, FetchFailure, Fetcher, PollingController,
    PollingError, PollingHandle, WidgetPhase,
};
use crate::selection::{SelectionAction, SelectionSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub struct CashierFetcher {
    api: Arc<dyn DashboardApi>,
}

impl CashierFetcher {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Fetcher<Vec<Cashier>> for CashierFetcher {
    async fn fetch(&self) -> Result<Vec<Cashier>, FetchFailure> {
        self.api
            .list_cashiers()
            .await
            .map_err(|e| super::into_failure(Source::Cashiers, e))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashierPanelSnapshot {
    pub phase: WidgetPhase,
    pub display: DisplayState<Vec<Cashier>>,
    pub empty: bool,
    pub selected: Vec<String>,
    pub all_selected: bool,
}

pub struct CashierPanel {
    handle: PollingHandle<Vec<Cashier>>,
    selection: SelectionSet,
}

impl CashierPanel {
    pub fn activate(
        api: Arc<dyn DashboardApi>,
        interval: Duration,
        events: Option<EventSender>,
    ) -> Self {
        let source = DataSource::new(Source::Cashiers, endpoints::CASHIERS, interval);
        let mut controller = PollingController::new(
            source,
            Arc::new(CashierFetcher::new(api)),
            FallbackPolicy::new(Vec::new()),
        );
        if let Some(events) = events {
            controller = controller.with_events(events);
        }
        Self {
            handle: controller.activate(),
            selection: SelectionSet::new(),
        }
    }

    pub fn handle(&self) -> &PollingHandle<Vec<Cashier>> {
        &self.handle
    }

    pub fn cashiers(&self) -> Vec<Cashier> {
        self.handle.display().value
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        let cashiers = self.cashiers();
        self.selection.select_all(&cashiers);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn reduce(&mut self, action: SelectionAction) {
        let cashiers = self.cashiers();
        self.selection.reduce(action, &cashiers);
    }

    /// Checked against the roster as currently displayed.
    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.cashiers())
    }

    /// Selected cashiers, dropping selections of cashiers no longer on the roster.
    pub fn selected(&mut self) -> Vec<Cashier> {
        let cashiers = self.cashiers();
        self.selection
            .selected(&cashiers)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn refresh(&self) -> Result<DisplayState<Vec<Cashier>>, PollingError> {
        self.handle.refresh().await
    }

    pub fn snapshot(&mut self) -> CashierPanelSnapshot {
        let state = self.handle.state();
        self.selection.prune(&state.display.value);
        CashierPanelSnapshot {
            phase: state.phase,
            empty: state.display.is_empty_result(),
            selected: self.selection.identities().map(str::to_string).collect(),
            all_selected: self.selection.is_all_selected(&state.display.value),
            display: state.display,
        }
    }

    pub async fn shutdown(self) {
        self.handle.shutdown().await;
    }
}
