//! Where positions come from.

use std::future::Future;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use super::LocationError;
use crate::domain::Coordinates;

/// A device position provider.
pub trait PositionSource: Send + Sync {
    /// Ask for the current position once.
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Always reports the same position (from flags or environment).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Reads a geolocation result from a JSON file on every request.
///
/// The file holds either a success, `{"coords":{"latitude":..,"longitude":..}}`,
/// or a failure carrying a numeric error code, `{"code":1}`.
#[derive(Debug, Clone)]
pub struct PositionFile {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CoordsDto {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PositionDocument {
    Position { coords: CoordsDto },
    Failure { code: u16 },
}

impl PositionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PositionSource for PositionFile {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "cannot read position file");
            LocationError::PositionUnavailable
        })?;

        let document: PositionDocument = serde_json::from_str(&contents).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "malformed position file");
            LocationError::PositionUnavailable
        })?;

        match document {
            PositionDocument::Position { coords } => {
                debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "read position file"
                );
                Coordinates::new(coords.latitude, coords.longitude).map_err(|e| {
                    warn!(error = %e, "position file holds invalid coordinates");
                    LocationError::PositionUnavailable
                })
            }
            PositionDocument::Failure { code } => Err(LocationError::from_code(code)),
        }
    }
}

/// The position sources the binary can be configured with.
#[derive(Debug, Clone)]
pub enum DeviceLocation {
    Fixed(FixedPosition),
    File(PositionFile),
}

impl PositionSource for DeviceLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match self {
            DeviceLocation::Fixed(source) => source.current_position().await,
            DeviceLocation::File(source) => source.current_position().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn read(contents: &str) -> Result<Coordinates, LocationError> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("position.json");
        std::fs::write(&path, contents).unwrap();
        PositionFile::new(&path).current_position().await
    }

    #[tokio::test]
    async fn reads_coordinates() {
        let position = read(r#"{"coords":{"latitude":1.29685,"longitude":103.854}}"#)
            .await
            .unwrap();
        assert_eq!(position.latitude(), 1.29685);
        assert_eq!(position.longitude(), 103.854);
    }

    #[tokio::test]
    async fn reads_error_codes() {
        assert_eq!(read(r#"{"code":1}"#).await, Err(LocationError::PermissionDenied));
        assert_eq!(read(r#"{"code":2}"#).await, Err(LocationError::PositionUnavailable));
        assert_eq!(read(r#"{"code":3}"#).await, Err(LocationError::Timeout));
        assert_eq!(read(r#"{"code":42}"#).await, Err(LocationError::Unknown));
    }

    #[tokio::test]
    async fn bad_documents_are_unavailable() {
        assert_eq!(read("not json").await, Err(LocationError::PositionUnavailable));
        assert_eq!(
            read(r#"{"coords":{"latitude":123.0,"longitude":0.0}}"#).await,
            Err(LocationError::PositionUnavailable)
        );
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let source = PositionFile::new(dir.path().join("nope.json"));
        assert_eq!(
            source.current_position().await,
            Err(LocationError::PositionUnavailable)
        );
    }

    #[tokio::test]
    async fn device_location_delegates() {
        let here = Coordinates::new(1.3, 103.8).unwrap();
        let device = DeviceLocation::Fixed(FixedPosition(here));
        assert_eq!(device.current_position().await, Ok(here));
    }
}
