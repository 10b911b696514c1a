//! Back office api client
//!
//! A JSON client for the dashboard endpoints of the store backend.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::api::payload::{parse_collection, parse_metrics, parse_status};
use crate::consts::cli_consts::{endpoints, http};
use crate::models::{Cashier, DateRange, KpiReport};
use crate::status::SubStatus;
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use serde_json::Value;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("pos-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn decode_response(response: Response) -> Result<Value, ApiError> {
        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&response_bytes)?)
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .send()
            .await?;

        Self::decode_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .json(body)
            .send()
            .await?;

        Self::decode_response(response).await
    }
}

#[async_trait::async_trait]
impl DashboardApi for ApiClient {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    async fn list_cashiers(&self) -> Result<Vec<Cashier>, ApiError> {
        let body = self.get_json(endpoints::CASHIERS).await?;
        parse_collection(body)
    }

    async fn integration_status(&self) -> Result<Vec<SubStatus>, ApiError> {
        let body = self.get_json(endpoints::INTEGRATION_STATUS).await?;
        parse_status(body)
    }

    async fn kpi_report(&self, range: &DateRange) -> Result<KpiReport, ApiError> {
        let body = self.post_json(endpoints::DASHBOARD_METRICS, range).await?;
        let mut report = parse_metrics(body)?;
        report.range = Some(*range);
        Ok(report)
    }
}

#[cfg(test)]
/// These are ignored by default since they require a live backend to run.
mod live_backend_tests {
    use crate::api::DashboardApi;
    use crate::environment::Environment;
    use crate::models::DateRange;

    fn client() -> super::ApiClient {
        super::ApiClient::new(Environment::Local.api_url()).unwrap()
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    async fn test_list_cashiers() {
        let cashiers = client().list_cashiers().await.unwrap();
        println!("{} cashiers", cashiers.len());
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    async fn test_integration_status() {
        let statuses = client().integration_status().await.unwrap();
        for status in statuses {
            println!("{}: {}", status.name, status.state);
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    async fn test_kpi_report() {
        let range = DateRange::default_window(chrono::Local::now().date_naive());
        let report = client().kpi_report(&range).await.unwrap();
        println!("{:?}", report);
    }
}
