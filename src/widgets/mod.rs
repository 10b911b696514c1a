//! Dashboard widgets
//!
//! Each widget is one `PollingController` over one endpoint plus whatever
//! user state it composes with the polled data.

pub mod cashiers;
pub mod integrations;
pub mod metrics;

pub use cashiers::{CashierPanel, CashierPanelSnapshot};
pub use integrations::{IntegrationPanelSnapshot, IntegrationStatusPanel};
pub use metrics::{MetricsPanel, MetricsPanelSnapshot};

use crate::api::error::ApiError;
use crate::events::Source;
use crate::polling::FetchFailure;

/// Convert an api error for the poller, logging it at its classified level.
/// The level travels with the failure onto the activity log.
pub(crate) fn into_failure(source: Source, error: ApiError) -> FetchFailure {
    let failure = FetchFailure::from(error);
    log::log!(
        target: "pos_dashboard::api",
        log::Level::from(failure.level),
        "{} request failed: {}",
        source,
        failure.message
    );
    failure
}
