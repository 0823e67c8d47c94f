//! Stop identifiers, coordinates and registry records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop code: {reason}")]
pub struct InvalidStopCode {
    reason: &'static str,
}

/// A stop identifier as issued by the stop registry.
///
/// Codes are opaque to us (usually five digits, e.g. `"01012"`), so the only
/// guarantee is that the code is non-empty and contains no whitespace. Leading
/// zeros are significant and preserved.
///
/// # Examples
///
/// ```
/// use nearby_buses::domain::StopCode;
///
/// let code = StopCode::parse("01012").unwrap();
/// assert_eq!(code.as_str(), "01012");
///
/// assert!(StopCode::parse("").is_err());
/// assert!(StopCode::parse("01 012").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopCode(String);

impl StopCode {
    /// Parse a stop code, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStopCode {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidStopCode {
                reason: "must not contain whitespace",
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopCode {
    type Error = InvalidStopCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StopCode> for String {
    fn from(code: StopCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for out-of-range or non-finite coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinates ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinates {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create coordinates, checking latitude ∈ [-90, 90] and longitude ∈ [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        let invalid = |reason| InvalidCoordinates {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude out of range"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude out of range"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// One entry of the stop registry.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub code: StopCode,
    pub name: String,
    pub position: Coordinates,
    /// Road the stop sits on, when the registry provides it.
    pub road: Option<String>,
}

impl StopRecord {
    pub fn new(code: StopCode, name: impl Into<String>, position: Coordinates) -> Self {
        Self {
            code,
            name: name.into(),
            position,
            road: None,
        }
    }

    pub fn with_road(mut self, road: impl Into<String>) -> Self {
        self.road = Some(road.into());
        self
    }
}

/// A stop paired with its distance from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStop {
    pub stop: StopRecord,
    /// Great-circle distance in kilometres.
    pub distance_km: f64,
}

impl RankedStop {
    /// Distance rounded to whole metres, as shown in the stop list.
    pub fn distance_m(&self) -> u64 {
        (self.distance_km * 1000.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_leading_zeros() {
        let code = StopCode::parse("01012").unwrap();
        assert_eq!(code.as_str(), "01012");
        assert_eq!(code.to_string(), "01012");
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(StopCode::parse("  10009 ").unwrap().as_str(), "10009");
    }

    #[test]
    fn reject_empty_and_inner_whitespace() {
        assert!(StopCode::parse("").is_err());
        assert!(StopCode::parse("   ").is_err());
        assert!(StopCode::parse("10 009").is_err());
    }

    #[test]
    fn debug() {
        let code = StopCode::parse("83139").unwrap();
        assert_eq!(format!("{code:?}"), "StopCode(83139)");
    }

    #[test]
    fn serde_rejects_empty_code() {
        let ok: StopCode = serde_json::from_str("\"01012\"").unwrap();
        assert_eq!(ok.as_str(), "01012");
        assert!(serde_json::from_str::<StopCode>("\"\"").is_err());
    }

    #[test]
    fn coordinates_range_checks() {
        assert!(Coordinates::new(1.3, 103.8).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn distance_rounds_to_metres() {
        let stop = StopRecord::new(
            StopCode::parse("1012").unwrap(),
            "Stop A",
            Coordinates::new(1.3, 103.8).unwrap(),
        );
        let ranked = RankedStop {
            stop,
            distance_km: 0.1234,
        };
        assert_eq!(ranked.distance_m(), 123);
    }
}
