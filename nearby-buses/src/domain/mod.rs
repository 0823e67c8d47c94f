//! Domain types for nearby stops and bus arrivals.
//!
//! Types validate their invariants on construction, so code receiving a
//! `StopCode` or `Coordinates` can trust it.

mod arrival;
mod service;
mod stop;

pub use arrival::{ArrivalEstimate, ArrivalRank, BusType, Crowding, Tone};
pub use service::{ServiceArrivals, ServiceNo, sort_services};
pub use stop::{Coordinates, InvalidCoordinates, InvalidStopCode, RankedStop, StopCode, StopRecord};
