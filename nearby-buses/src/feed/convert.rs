//! Conversion from feed DTOs to domain types.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    ArrivalEstimate, ArrivalRank, BusType, Coordinates, Crowding, ServiceArrivals, ServiceNo,
    StopCode, StopRecord,
};

use super::types::{ArrivalsResponse, EstimateDto, RegistryDto, ServiceDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Registry key is not a usable stop code
    #[error("invalid stop code {0:?}")]
    InvalidStopCode(String),

    /// Registry entry is not `[lon, lat, name, ...]`
    #[error("malformed registry entry for {code}: {reason}")]
    MalformedStop { code: String, reason: &'static str },

    /// Registry coordinates are out of range
    #[error("stop {code} has invalid coordinates: {message}")]
    InvalidCoordinates { code: String, message: String },
}

/// Convert the registry map into stop records, preserving registry order.
///
/// Any malformed entry fails the whole registry: a partial registry would
/// silently hide the user's nearest stop.
pub fn convert_registry(registry: &RegistryDto) -> Result<Vec<StopRecord>, ConversionError> {
    registry
        .iter()
        .map(|(code, entry)| convert_stop(code, entry))
        .collect()
}

fn convert_stop(code: &str, entry: &Value) -> Result<StopRecord, ConversionError> {
    let malformed = |reason| ConversionError::MalformedStop {
        code: code.to_string(),
        reason,
    };

    let stop_code =
        StopCode::parse(code).map_err(|_| ConversionError::InvalidStopCode(code.to_string()))?;

    let fields = entry.as_array().ok_or_else(|| malformed("expected an array"))?;
    if fields.len() < 3 {
        return Err(malformed("expected at least 3 elements"));
    }

    let longitude = fields[0]
        .as_f64()
        .ok_or_else(|| malformed("longitude is not a number"))?;
    let latitude = fields[1]
        .as_f64()
        .ok_or_else(|| malformed("latitude is not a number"))?;
    let name = fields[2]
        .as_str()
        .ok_or_else(|| malformed("name is not a string"))?;

    let position =
        Coordinates::new(latitude, longitude).map_err(|e| ConversionError::InvalidCoordinates {
            code: code.to_string(),
            message: e.to_string(),
        })?;

    let mut stop = StopRecord::new(stop_code, name, position);
    if let Some(road) = fields.get(3).and_then(Value::as_str) {
        stop = stop.with_road(road);
    }

    Ok(stop)
}

/// Convert an arrivals response, keeping feed order.
///
/// Estimates without a usable timestamp are dropped; a service can end up
/// with no estimates, which the board shows as "no timing".
pub fn convert_arrivals(response: &ArrivalsResponse) -> Vec<ServiceArrivals> {
    response.services.iter().map(convert_service).collect()
}

fn convert_service(dto: &ServiceDto) -> ServiceArrivals {
    let slots = [&dto.next, &dto.subsequent, &dto.next3];

    let estimates = ArrivalRank::ALL
        .into_iter()
        .zip(slots)
        .filter_map(|(rank, slot)| {
            let estimate = slot.as_ref()?;
            convert_estimate(&dto.no, rank, estimate)
        })
        .collect();

    ServiceArrivals {
        service_no: ServiceNo::new(dto.no.clone()),
        operator: dto.operator.clone().filter(|op| !op.is_empty()),
        estimates,
    }
}

fn convert_estimate(service: &str, rank: ArrivalRank, dto: &EstimateDto) -> Option<ArrivalEstimate> {
    let raw = dto.time.as_deref().filter(|t| !t.is_empty())?;

    let arrival_time = match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            warn!(service, rank = rank.tag(), time = raw, error = %e, "skipping estimate with bad timestamp");
            return None;
        }
    };

    Some(ArrivalEstimate {
        rank,
        arrival_time,
        crowding: Crowding::from_code(dto.load.as_deref().unwrap_or_default()),
        bus_type: BusType::from_code(dto.bus_type.as_deref().unwrap_or_default()),
        wheelchair_accessible: dto.feature.as_deref() == Some("WAB"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn registry(json: &str) -> RegistryDto {
        serde_json::from_str(json).unwrap()
    }

    fn arrivals(json: &str) -> ArrivalsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn registry_entry_order_is_lon_lat_name() {
        let stops = convert_registry(&registry(r#"{"1012":[103.8,1.3,"Stop A"]}"#)).unwrap();

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].code.as_str(), "1012");
        assert_eq!(stops[0].name, "Stop A");
        assert_eq!(stops[0].position.latitude(), 1.3);
        assert_eq!(stops[0].position.longitude(), 103.8);
        assert_eq!(stops[0].road, None);
    }

    #[test]
    fn registry_road_is_optional_fourth_element() {
        let stops =
            convert_registry(&registry(r#"{"01012":[103.85,1.29,"Hotel Grand Pacific","Victoria St"]}"#))
                .unwrap();
        assert_eq!(stops[0].road.as_deref(), Some("Victoria St"));
    }

    #[test]
    fn registry_preserves_order() {
        let stops = convert_registry(&registry(
            r#"{"3":[103.8,1.3,"C"],"1":[103.8,1.3,"A"],"2":[103.8,1.3,"B"]}"#,
        ))
        .unwrap();
        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn registry_rejects_short_entry() {
        let err = convert_registry(&registry(r#"{"1012":[103.8,1.3]}"#)).unwrap_err();
        assert!(matches!(err, ConversionError::MalformedStop { .. }));
    }

    #[test]
    fn registry_rejects_wrong_types() {
        assert!(convert_registry(&registry(r#"{"1012":["103.8",1.3,"A"]}"#)).is_err());
        assert!(convert_registry(&registry(r#"{"1012":[103.8,1.3,7]}"#)).is_err());
        assert!(convert_registry(&registry(r#"{"1012":{"lat":1.3}}"#)).is_err());
    }

    #[test]
    fn registry_rejects_swapped_coordinates() {
        // Latitude 103.8 is out of range.
        let err = convert_registry(&registry(r#"{"1012":[1.3,103.8,"A"]}"#)).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidCoordinates { .. }));
    }

    #[test]
    fn arrivals_convert_all_ranks() {
        let services = convert_arrivals(&arrivals(
            r#"{"services":[{"no":"12","operator":"SBST",
                "next":{"time":"2024-05-01T08:01:05+08:00","load":"SEA","type":"DD","feature":"WAB"},
                "subsequent":{"time":"2024-05-01T08:10:00+08:00","load":"SDA","type":"SD"},
                "next3":{"time":"2024-05-01T08:20:00+08:00","load":"LSD","type":"BD"}}]}"#,
        ));

        assert_eq!(services.len(), 1);
        let svc = &services[0];
        assert_eq!(svc.service_no.as_str(), "12");
        assert_eq!(svc.operator.as_deref(), Some("SBST"));
        assert_eq!(svc.estimates.len(), 3);

        let next = &svc.estimates[0];
        assert_eq!(next.rank, ArrivalRank::Next);
        assert_eq!(
            next.arrival_time,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 1, 5).unwrap()
        );
        assert_eq!(next.crowding, Crowding::Seated);
        assert_eq!(next.bus_type, BusType::DoubleDeck);
        assert!(next.wheelchair_accessible);

        assert_eq!(svc.estimates[1].rank, ArrivalRank::Subsequent);
        assert!(!svc.estimates[1].wheelchair_accessible);
        assert_eq!(svc.estimates[2].rank, ArrivalRank::Third);
        assert_eq!(svc.estimates[2].crowding, Crowding::LimitedStanding);
    }

    #[test]
    fn missing_and_empty_times_are_absent() {
        let services = convert_arrivals(&arrivals(
            r#"{"services":[{"no":"7","next":{"time":"","load":"SEA"},"subsequent":{"time":null}}]}"#,
        ));
        assert!(services[0].has_no_timing());
    }

    #[test]
    fn bad_timestamp_drops_only_that_estimate() {
        let services = convert_arrivals(&arrivals(
            r#"{"services":[{"no":"7",
                "next":{"time":"soon","load":"SEA"},
                "subsequent":{"time":"2024-05-01T08:10:00+08:00","load":"SDA"}}]}"#,
        ));
        assert_eq!(services[0].estimates.len(), 1);
        assert_eq!(services[0].estimates[0].rank, ArrivalRank::Subsequent);
    }

    #[test]
    fn skipped_slot_keeps_rank_of_later_estimates() {
        let services = convert_arrivals(&arrivals(
            r#"{"services":[{"no":"7","next3":{"time":"2024-05-01T08:10:00+08:00"}}]}"#,
        ));
        assert_eq!(services[0].estimates[0].rank, ArrivalRank::Third);
        assert_eq!(services[0].estimates[0].crowding, Crowding::Unknown);
        assert_eq!(services[0].estimates[0].bus_type, BusType::Other(String::new()));
    }
}
