use crate::api::error::ApiError;
use crate::models::{Cashier, DateRange, KpiReport};
use crate::status::SubStatus;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod payload;

#[cfg(test)]
use mockall::{automock, predicate::*};

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Base URL requests are sent to.
    fn base_url(&self) -> String;

    /// The cashier roster.
    async fn list_cashiers(&self) -> Result<Vec<Cashier>, ApiError>;

    /// Health of every integration the store is connected to.
    async fn integration_status(&self) -> Result<Vec<SubStatus>, ApiError>;

    /// KPI figures for the given reporting window.
    async fn kpi_report(&self, range: &DateRange) -> Result<KpiReport, ApiError>;
}
