//! Nearest-stop ranking.
//!
//! Distances are great-circle (haversine) distances on a spherical Earth,
//! which is plenty for ranking a few thousand stops around one user.

mod distance;
mod rank;

pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use rank::{DEFAULT_NEAREST, rank_nearest_stops};
