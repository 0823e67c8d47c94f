//! Fixture-backed feed for development and tests without network access.
//!
//! Reads the same JSON the live endpoints serve, from a directory laid out as:
//!
//! ```text
//! <dir>/stops.json            registry body
//! <dir>/arrivals/<code>.json  arrivals body per stop
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{ServiceArrivals, StopCode, StopRecord};

use super::TransitFeed;
use super::convert::{convert_arrivals, convert_registry};
use super::error::FetchError;
use super::types::{ArrivalsResponse, RegistryDto};

/// Mock feed that serves JSON files from a directory.
///
/// Files are read on every call, so fixtures can be edited while the
/// client runs.
#[derive(Debug, Clone)]
pub struct MockFeed {
    dir: PathBuf,
}

impl MockFeed {
    /// Create a mock feed over `dir`, which must contain `stops.json`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let dir = dir.as_ref().to_path_buf();
        let stops = dir.join("stops.json");

        if !stops.is_file() {
            return Err(FetchError::Io {
                path: stops.display().to_string(),
                message: "mock registry not found".to_string(),
            });
        }

        Ok(Self { dir })
    }

    /// Stop codes that have an arrivals fixture.
    pub fn available_stops(&self) -> Vec<StopCode> {
        let Ok(entries) = std::fs::read_dir(self.dir.join("arrivals")) else {
            return Vec::new();
        };

        let mut codes: Vec<StopCode> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                StopCode::parse(stem).ok()
            })
            .collect();
        codes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        codes
    }

    async fn read(&self, path: &Path) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::Status {
                    status: 404,
                    url: path.display().to_string(),
                }
            } else {
                FetchError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

impl TransitFeed for MockFeed {
    async fn fetch_stops(&self) -> Result<Vec<StopRecord>, FetchError> {
        let body = self.read(&self.dir.join("stops.json")).await?;
        let registry: RegistryDto = serde_json::from_str(&body).map_err(FetchError::parse)?;
        convert_registry(&registry).map_err(FetchError::parse)
    }

    async fn fetch_arrivals(&self, stop: &StopCode) -> Result<Vec<ServiceArrivals>, FetchError> {
        let path = self
            .dir
            .join("arrivals")
            .join(format!("{}.json", stop.as_str()));
        let body = self.read(&path).await?;
        let response: ArrivalsResponse = serde_json::from_str(&body).map_err(FetchError::parse)?;

        debug!(stop = %stop, path = %path.display(), "served mock arrivals");
        Ok(convert_arrivals(&response))
    }
}
