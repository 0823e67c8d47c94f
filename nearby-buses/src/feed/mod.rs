//! Stop registry and arrivals feed.
//!
//! Two public endpoints back the whole client:
//! - the stop registry, a JSON object of stop code → `[lon, lat, name, road]`
//! - the arrivals feed, queried per stop with `?id=<code>`
//!
//! [`TransitFeed`] is the seam between the app and the network so the app
//! can be driven from fixtures in tests and offline development.

mod client;
mod convert;
mod error;
mod mock;
mod types;

use std::future::Future;

use crate::domain::{ServiceArrivals, StopCode, StopRecord};

pub use client::{DEFAULT_ARRIVALS_URL, DEFAULT_STOPS_URL, FeedClient, FeedConfig};
pub use convert::{ConversionError, convert_arrivals, convert_registry};
pub use error::FetchError;
pub use mock::MockFeed;
pub use types::{ArrivalsResponse, EstimateDto, RegistryDto, ServiceDto};

/// Source of stops and arrivals.
pub trait TransitFeed: Send + Sync {
    /// Fetch the full stop registry, in registry order.
    fn fetch_stops(&self) -> impl Future<Output = Result<Vec<StopRecord>, FetchError>> + Send;

    /// Fetch arrivals for one stop, in feed order.
    fn fetch_arrivals(
        &self,
        stop: &StopCode,
    ) -> impl Future<Output = Result<Vec<ServiceArrivals>, FetchError>> + Send;
}

/// Either the live endpoints or local fixtures, chosen at startup.
#[derive(Debug, Clone)]
pub enum Feed {
    Live(FeedClient),
    Mock(MockFeed),
}

impl TransitFeed for Feed {
    async fn fetch_stops(&self) -> Result<Vec<StopRecord>, FetchError> {
        match self {
            Feed::Live(client) => client.fetch_stops().await,
            Feed::Mock(mock) => mock.fetch_stops().await,
        }
    }

    async fn fetch_arrivals(&self, stop: &StopCode) -> Result<Vec<ServiceArrivals>, FetchError> {
        match self {
            Feed::Live(client) => client.fetch_arrivals(stop).await,
            Feed::Mock(mock) => mock.fetch_arrivals(stop).await,
        }
    }
}
