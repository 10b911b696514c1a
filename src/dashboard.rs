//! Dashboard composition
//!
//! Starts every widget against one api, owns the session-scoped navigation
//! state and produces a serializable snapshot of everything shown.

use crate::api::DashboardApi;
use crate::config::{Config, PollSettings};
use crate::events::EventSender;
use crate::models::DateRange;
use crate::navigation::{
    NavigationAction, NavigationSection, NavigationState, NavigationView, Role, catalog,
};
use crate::status::ConnectionState;
use crate::widgets::{
    CashierPanel, CashierPanelSnapshot, IntegrationPanelSnapshot, IntegrationStatusPanel,
    MetricsPanel, MetricsPanelSnapshot,
};
use chrono::{DateTime, Local, Utc};
use log::info;
use serde::Serialize;
use std::sync::Arc;

/// Everything needed to start a dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub role: Option<Role>,
    pub polling: PollSettings,
    pub metrics_range: DateRange,
    pub sections: Vec<NavigationSection>,
    pub location: String,
}

impl DashboardSettings {
    /// Settings from a config file. The navigation file, when set, must load.
    pub fn from_config(config: &Config) -> Result<Self, std::io::Error> {
        let sections = match &config.navigation_file {
            Some(path) => catalog::load_sections(path)?,
            None => catalog::default_sections(),
        };
        Ok(Self {
            role: config.role,
            polling: config.polling,
            metrics_range: DateRange::default_window(Local::now().date_naive()),
            sections,
            location: "/".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub taken_at: DateTime<Utc>,
    pub navigation: NavigationView,
    pub integrations: IntegrationPanelSnapshot,
    pub cashiers: CashierPanelSnapshot,
    pub metrics: MetricsPanelSnapshot,
}

impl DashboardSnapshot {
    pub fn overall_status(&self) -> ConnectionState {
        self.integrations.overall
    }
}

pub struct Dashboard {
    role: Option<Role>,
    location: String,
    sections: Vec<NavigationSection>,
    navigation: NavigationState,
    pub integrations: IntegrationStatusPanel,
    pub cashiers: CashierPanel,
    pub metrics: MetricsPanel,
}

impl Dashboard {
    /// Activate every widget. Must be called from within a tokio runtime.
    pub fn start(
        api: Arc<dyn DashboardApi>,
        settings: DashboardSettings,
        events: Option<EventSender>,
    ) -> Self {
        info!(
            "Starting dashboard against {} for role {}",
            api.base_url(),
            settings
                .role
                .map(|role| role.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        let polling = settings.polling;
        Self {
            role: settings.role,
            location: settings.location,
            sections: settings.sections,
            navigation: NavigationState::new(),
            integrations: IntegrationStatusPanel::activate(
                Arc::clone(&api),
                polling.status_interval(),
                events.clone(),
            ),
            cashiers: CashierPanel::activate(
                Arc::clone(&api),
                polling.cashiers_interval(),
                events.clone(),
            ),
            metrics: MetricsPanel::activate(
                api,
                settings.metrics_range,
                polling.metrics_interval(),
                events,
            ),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn navigate(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn dispatch(&mut self, action: NavigationAction) {
        self.navigation = std::mem::take(&mut self.navigation).reduce(action);
    }

    pub fn navigation(&self) -> NavigationView {
        self.navigation.view(&self.sections, self.role, &self.location)
    }

    pub async fn snapshot(&mut self) -> DashboardSnapshot {
        DashboardSnapshot {
            taken_at: Utc::now(),
            navigation: self.navigation(),
            integrations: self.integrations.snapshot(),
            cashiers: self.cashiers.snapshot(),
            metrics: self.metrics.snapshot().await,
        }
    }

    /// Deactivate every widget and wait for their pollers to exit.
    pub async fn shutdown(self) {
        tokio::join!(
            self.integrations.shutdown(),
            self.cashiers.shutdown(),
            self.metrics.shutdown(),
        );
    }
}
