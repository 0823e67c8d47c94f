//! HTTP client for the stop registry and arrivals feed.

use std::time::Duration;

use tracing::debug;

use crate::domain::{ServiceArrivals, StopCode, StopRecord};

use super::TransitFeed;
use super::convert::{convert_arrivals, convert_registry};
use super::error::FetchError;
use super::types::{ArrivalsResponse, RegistryDto};

/// Default stop registry URL.
pub const DEFAULT_STOPS_URL: &str = "https://data.busrouter.sg/v1/stops.min.json";

/// Default arrivals URL; the stop code goes in the `id` query parameter.
pub const DEFAULT_ARRIVALS_URL: &str = "https://arrivelah2.busrouter.sg/";

/// Configuration for the feed client.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Stop registry URL
    pub stops_url: String,
    /// Arrivals endpoint URL
    pub arrivals_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Set the stop registry URL.
    pub fn with_stops_url(mut self, url: impl Into<String>) -> Self {
        self.stops_url = url.into();
        self
    }

    /// Set the arrivals endpoint URL.
    pub fn with_arrivals_url(mut self, url: impl Into<String>) -> Self {
        self.arrivals_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            stops_url: DEFAULT_STOPS_URL.to_string(),
            arrivals_url: DEFAULT_ARRIVALS_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the public registry and arrivals endpoints.
///
/// Both endpoints are unauthenticated GETs. Nothing is cached: the registry
/// is refetched on every locate.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    stops_url: String,
    arrivals_url: String,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            stops_url: config.stops_url,
            arrivals_url: config.arrivals_url,
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

impl TransitFeed for FeedClient {
    async fn fetch_stops(&self) -> Result<Vec<StopRecord>, FetchError> {
        let body = self.get_text(&self.stops_url, &[]).await?;
        let registry: RegistryDto = serde_json::from_str(&body).map_err(FetchError::parse)?;
        let stops = convert_registry(&registry).map_err(FetchError::parse)?;

        debug!(count = stops.len(), "fetched stop registry");
        Ok(stops)
    }

    async fn fetch_arrivals(&self, stop: &StopCode) -> Result<Vec<ServiceArrivals>, FetchError> {
        let body = self
            .get_text(&self.arrivals_url, &[("id", stop.as_str())])
            .await?;
        let response: ArrivalsResponse = serde_json::from_str(&body).map_err(FetchError::parse)?;
        let services = convert_arrivals(&response);

        debug!(stop = %stop, services = services.len(), "fetched arrivals");
        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.stops_url, DEFAULT_STOPS_URL);
        assert_eq!(config.arrivals_url, DEFAULT_ARRIVALS_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builder() {
        let config = FeedConfig::default()
            .with_stops_url("http://localhost:8080/stops.json")
            .with_arrivals_url("http://localhost:8080/arrivals")
            .with_timeout(5);

        assert_eq!(config.stops_url, "http://localhost:8080/stops.json");
        assert_eq!(config.arrivals_url, "http://localhost:8080/arrivals");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn client_creation() {
        assert!(FeedClient::new(FeedConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = FeedConfig::default()
            .with_stops_url("http://127.0.0.1:9/stops.json")
            .with_timeout(2);
        let client = FeedClient::new(config).unwrap();

        let err = client.fetch_stops().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }
}
