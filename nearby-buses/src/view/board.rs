//! Rendering arrivals into a panel.

use chrono::Local;
use tracing::debug;

use crate::countdown::CountdownContext;
use crate::domain::{ArrivalRank, ServiceArrivals, ServiceNo, StopCode, sort_services};

use super::panel::{BoardContent, Panel, ServiceCard, SlotCard};
use super::surface::Element;

/// Shown when the stop has no services at all.
pub const NO_TIMINGS: &str = "No bus timings available.";

/// Shown for a service that has no estimates.
pub const NO_TIMING_FOR_SERVICE: &str = "No timing available";

/// Element id of one arrival slot: `{rankTag}-{serviceNo}`.
pub fn element_id(rank: ArrivalRank, service: &ServiceNo) -> String {
    format!("{}-{}", rank.tag(), service.as_str())
}

/// Render `services` as the panel's arrivals board.
///
/// Previous timers of the panel are cancelled and its elements detached
/// before anything new is created. Each estimate gets one element and one
/// countdown timer.
pub async fn render_arrivals(
    panel: &Panel,
    stop: &StopCode,
    mut services: Vec<ServiceArrivals>,
    context: &CountdownContext,
) {
    panel.countdowns().cancel_all();
    panel.surface().clear().await;

    let content = if services.is_empty() {
        BoardContent::Message(NO_TIMINGS.to_string())
    } else {
        sort_services(&mut services);

        let mut cards = Vec::with_capacity(services.len());
        for service in services {
            let mut slots = Vec::with_capacity(service.estimates.len());

            for estimate in service.estimates {
                let id = element_id(estimate.rank, &service.service_no);
                let reading = context.read(estimate.arrival_time);
                panel.surface().insert(id.clone(), Element::from(&reading)).await;
                panel.countdowns().start(
                    id.clone(),
                    estimate.arrival_time,
                    panel.surface().clone(),
                    context.clone(),
                );

                slots.push(SlotCard {
                    element_id: id,
                    rank: estimate.rank,
                    crowding: estimate.crowding,
                    bus_type: estimate.bus_type,
                    wheelchair_accessible: estimate.wheelchair_accessible,
                });
            }

            cards.push(ServiceCard {
                service_no: service.service_no,
                operator: service.operator,
                slots,
            });
        }
        BoardContent::Services(cards)
    };

    debug!(
        panel = ?panel.kind(),
        stop = %stop,
        timers = panel.countdowns().live(),
        "rendered arrivals"
    );

    let mut state = panel.state().write().await;
    state.selected = Some(stop.clone());
    state.content = content;
    state.last_updated = Some(Local::now());
}
