//! The HTTP client for the statistics API: endpoint URLs, optional CORS
//! proxy prefix, bearer-token auth, and a concurrent dashboard snapshot.

use std::env;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::wire::{CoverageResponse, FactsResponse, MsgRatesResponse, WireSensor};

const DEFAULT_BASE_URL: &str = "https://opensky-network.org";

#[derive(Debug)]
pub enum SensorApiError {
    Http(reqwest::Error),
    Status(u16, String),
}

impl fmt::Display for SensorApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorApiError::Http(e) => write!(f, "request failed: {e}"),
            SensorApiError::Status(status, url) => write!(f, "upstream HTTP {status} for {url}"),
        }
    }
}

impl std::error::Error for SensorApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SensorApiError::Http(e) => Some(e),
            SensorApiError::Status(..) => None,
        }
    }
}

impl From<reqwest::Error> for SensorApiError {
    fn from(e: reqwest::Error) -> Self {
        SensorApiError::Http(e)
    }
}

/// Where and how to reach the API. Browser-hosted callers route through a
/// CORS proxy; the proxy URL is simply prepended to the target URL.
#[derive(Debug, Clone)]
pub struct SensorApiConfig {
    pub base_url: String,
    pub proxy: Option<String>,
    pub token: Option<String>,
}

impl Default for SensorApiConfig {
    fn default() -> Self {
        SensorApiConfig {
            base_url: DEFAULT_BASE_URL.to_owned(),
            proxy: None,
            token: None,
        }
    }
}

impl SensorApiConfig {
    /// Read `SENSOR_API_URL`, `SENSOR_API_PROXY`, and `SENSOR_API_TOKEN`,
    /// falling back to the public API with no proxy and no token.
    pub fn from_env() -> Self {
        SensorApiConfig {
            base_url: env::var("SENSOR_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            proxy: env::var("SENSOR_API_PROXY").ok().filter(|s| !s.is_empty()),
            token: env::var("SENSOR_API_TOKEN").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Full URL for a path-and-query, proxy prefix included.
    pub fn url(&self, path_and_query: &str) -> String {
        let proxy = self.proxy.as_deref().unwrap_or("");
        format!("{proxy}{}{path_and_query}", self.base_url)
    }
}

pub struct SensorApiClient {
    config: SensorApiConfig,
    http: reqwest::Client,
}

impl SensorApiClient {
    pub fn new(config: SensorApiConfig) -> Result<Self, SensorApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(SensorApiClient { config, http })
    }

    pub fn config(&self) -> &SensorApiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SensorApiError> {
        tracing::debug!(%url, "fetching");
        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SensorApiError::Status(status.as_u16(), url));
        }
        Ok(response.json().await?)
    }

    /// Network-wide statistics (daily and cumulative message counts).
    pub async fn facts(&self) -> Result<FactsResponse, SensorApiError> {
        self.get_json(self.config.url("/api/stats/facts?extended=true"))
            .await
    }

    /// Every receiver known to the network.
    pub async fn sensor_list(&self) -> Result<Vec<WireSensor>, SensorApiError> {
        self.get_json(self.config.url("/api/sensor/list")).await
    }

    /// Recent message-rate series, keyed by serial.
    pub async fn message_rates(&self) -> Result<MsgRatesResponse, SensorApiError> {
        self.get_json(self.config.url("/api/stats/msg-rates")).await
    }

    /// Coverage ranges of one sensor for one day (`YYYYMMDD`).
    pub async fn coverage(&self, day: &str, serial: i64) -> Result<CoverageResponse, SensorApiError> {
        self.get_json(
            self.config
                .url(&format!("/api/range/days?days={day}&serials={serial}")),
        )
        .await
    }
}

/// Everything the dashboard needs up front, fetched concurrently.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub facts: FactsResponse,
    pub sensors: Vec<WireSensor>,
    pub rates: MsgRatesResponse,
}

pub async fn dashboard_snapshot(
    client: &SensorApiClient,
) -> Result<DashboardSnapshot, SensorApiError> {
    let (facts, sensors, rates) = futures_util::try_join!(
        client.facts(),
        client.sensor_list(),
        client.message_rates()
    )?;
    tracing::info!(sensors = sensors.len(), "dashboard snapshot loaded");
    Ok(DashboardSnapshot {
        facts,
        sensors,
        rates,
    })
}
