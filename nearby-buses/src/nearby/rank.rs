//! Ranking stops by distance from the user.

use crate::domain::{Coordinates, RankedStop, StopRecord};

use super::distance::haversine_km;

/// How many stops the nearby list shows by default.
pub const DEFAULT_NEAREST: usize = 10;

/// Return the `k` stops closest to `origin`, nearest first.
///
/// The sort is stable, so stops at equal distance keep registry order.
/// The result has `min(k, stops.len())` entries.
pub fn rank_nearest_stops(origin: Coordinates, stops: &[StopRecord], k: usize) -> Vec<RankedStop> {
    let mut ranked: Vec<RankedStop> = stops
        .iter()
        .map(|stop| RankedStop {
            distance_km: haversine_km(origin, stop.position),
            stop: stop.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    ranked
}
