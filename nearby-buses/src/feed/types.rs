//! Wire types for the stop registry and arrivals feed.
//!
//! These mirror the JSON exactly; [`super::convert`] turns them into domain
//! types.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Stop registry body: stop code → `[longitude, latitude, name, road?]`.
///
/// Kept as a JSON map so registry order survives (`preserve_order`).
pub type RegistryDto = Map<String, Value>;

/// Arrivals body for one stop.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalsResponse {
    /// Missing `services` is treated like an empty list.
    #[serde(default)]
    pub services: Vec<ServiceDto>,
}

/// One service at the stop.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDto {
    pub no: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub next: Option<EstimateDto>,
    #[serde(default)]
    pub subsequent: Option<EstimateDto>,
    #[serde(default)]
    pub next3: Option<EstimateDto>,
}

/// One arrival estimate. Any field may be missing or null when the
/// operator has no prediction for that slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateDto {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub load: Option<String>,
    #[serde(default, rename = "type")]
    pub bus_type: Option<String>,
    /// `"WAB"` marks a wheelchair-accessible bus.
    #[serde(default)]
    pub feature: Option<String>,
}
