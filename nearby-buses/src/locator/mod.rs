//! Device location.
//!
//! A [`Locator`] asks its [`PositionSource`] for the current position,
//! showing a loading indicator while it waits and translating every failure
//! into a [`LocationError`] with a user-facing message.

mod source;

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::Coordinates;
use crate::view::LoadingIndicator;

pub use source::{DeviceLocation, FixedPosition, PositionFile, PositionSource};

/// Default time allowed for a position request.
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Why the position could not be determined.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not supported by this browser.")]
    Unsupported,

    #[error("User denied the request for Geolocation.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    PositionUnavailable,

    #[error("The request to get user location timed out.")]
    Timeout,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl LocationError {
    /// Map a geolocation platform error code (1, 2, 3; anything else is unknown).
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

/// Resolves the user's position from an optional source.
#[derive(Debug, Clone)]
pub struct Locator<S> {
    source: Option<S>,
    timeout: Duration,
}

impl<S: PositionSource> Locator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            timeout: DEFAULT_LOCATE_TIMEOUT,
        }
    }

    /// A locator with no position source; every request is `Unsupported`.
    pub fn unsupported() -> Self {
        Self {
            source: None,
            timeout: DEFAULT_LOCATE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_some()
    }

    /// Ask for the current position.
    ///
    /// `loading` is visible while the source is consulted and hidden again
    /// on either outcome.
    pub async fn locate(&self, loading: &LoadingIndicator) -> Result<Coordinates, LocationError> {
        let Some(source) = &self.source else {
            warn!("no position source configured");
            return Err(LocationError::Unsupported);
        };

        let _guard = loading.show();
        let result = match tokio::time::timeout(self.timeout, source.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        };

        match &result {
            Ok(position) => info!(%position, "located"),
            Err(e) => warn!(error = %e, "locating failed"),
        }
        result
    }
}
