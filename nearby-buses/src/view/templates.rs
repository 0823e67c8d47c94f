//! Askama text templates for the terminal board.

use std::collections::HashMap;

use askama::Template;

use crate::countdown::EXPIRED_TEXT;
use crate::domain::RankedStop;
use crate::favorites::FavoriteStop;

use super::board::NO_TIMING_FOR_SERVICE;
use super::panel::{BoardContent, PanelState, ServiceCard, SlotCard};
use super::surface::Element;

// ============================================================================
// Templates
// ============================================================================

/// Nearest stops list.
#[derive(Template)]
#[template(path = "stop_list.txt")]
pub struct StopListTemplate {
    pub loading: bool,
    pub status: String,
    pub stops: Vec<StopView>,
}

/// Arrivals board of one panel.
#[derive(Template)]
#[template(path = "board.txt")]
pub struct BoardTemplate {
    pub title: String,
    pub stop: String,
    pub loading: bool,
    pub message: String,
    pub services: Vec<ServiceView>,
    pub no_timing: &'static str,
    pub last_updated: String,
}

/// Saved favourites.
#[derive(Template)]
#[template(path = "favorites.txt")]
pub struct FavoritesTemplate {
    pub favorites: Vec<FavoriteView>,
}

// ============================================================================
// View models
// ============================================================================

#[derive(Debug, Clone)]
pub struct StopView {
    /// 1-based position, as typed by the user.
    pub index: usize,
    pub code: String,
    pub name: String,
    pub road: String,
    pub distance_m: u64,
}

impl StopView {
    pub fn from_ranked(index: usize, ranked: &RankedStop) -> Self {
        Self {
            index: index + 1,
            code: ranked.stop.code.to_string(),
            name: ranked.stop.name.clone(),
            road: ranked.stop.road.clone().unwrap_or_default(),
            distance_m: ranked.distance_m(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceView {
    pub number: String,
    pub operator: String,
    pub slots: Vec<SlotView>,
}

impl ServiceView {
    fn from_card(card: &ServiceCard, elements: &HashMap<String, Element>) -> Self {
        Self {
            number: card.service_no.to_string(),
            operator: card.operator.clone().unwrap_or_default(),
            slots: card
                .slots
                .iter()
                .map(|slot| SlotView::from_card(slot, elements))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlotView {
    pub text: String,
    pub urgency: &'static str,
    pub crowding: String,
    pub tone: &'static str,
    pub bus_type: String,
    pub accessible: bool,
}

impl SlotView {
    fn from_card(slot: &SlotCard, elements: &HashMap<String, Element>) -> Self {
        // A slot whose element was detached shows as expired.
        let (text, urgency) = match elements.get(&slot.element_id) {
            Some(element) => (element.text.clone(), element.urgency.as_str()),
            None => (EXPIRED_TEXT.to_string(), ""),
        };

        let crowding = match (slot.crowding.glyph(), slot.crowding.label()) {
            ("", _) => String::new(),
            (glyph, label) => format!("{glyph} {label}"),
        };

        Self {
            text,
            urgency,
            crowding,
            tone: slot.crowding.tone().as_str(),
            bus_type: slot.bus_type.code().to_string(),
            accessible: slot.wheelchair_accessible,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FavoriteView {
    pub index: usize,
    pub code: String,
    pub name: String,
}

impl FavoriteView {
    pub fn from_favorite(index: usize, favorite: &FavoriteStop) -> Self {
        Self {
            index: index + 1,
            code: favorite.code.to_string(),
            name: favorite.name.clone(),
        }
    }
}

impl BoardTemplate {
    /// Build the board from a panel's state and a snapshot of its surface.
    pub fn from_state(
        title: &str,
        loading: bool,
        state: &PanelState,
        elements: &HashMap<String, Element>,
    ) -> Self {
        let (message, services) = match &state.content {
            BoardContent::Empty => (String::new(), Vec::new()),
            BoardContent::Message(message) => (message.clone(), Vec::new()),
            BoardContent::Services(cards) => (
                String::new(),
                cards
                    .iter()
                    .map(|card| ServiceView::from_card(card, elements))
                    .collect(),
            ),
        };

        Self {
            title: title.to_string(),
            stop: state
                .selected
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            loading,
            message,
            services,
            no_timing: NO_TIMING_FOR_SERVICE,
            last_updated: state
                .last_updated
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::Urgency;
    use crate::domain::{
        ArrivalRank, BusType, Coordinates, Crowding, ServiceNo, StopCode, StopRecord,
    };

    fn card(no: &str, slots: Vec<SlotCard>) -> ServiceCard {
        ServiceCard {
            service_no: ServiceNo::new(no),
            operator: Some("SBST".into()),
            slots,
        }
    }

    fn slot(id: &str, crowding: Crowding) -> SlotCard {
        SlotCard {
            element_id: id.into(),
            rank: ArrivalRank::Next,
            crowding,
            bus_type: BusType::DoubleDeck,
            wheelchair_accessible: true,
        }
    }

    #[test]
    fn board_renders_live_text() {
        let state = PanelState {
            selected: Some(StopCode::parse("01012").unwrap()),
            content: BoardContent::Services(vec![
                card("12", vec![slot("next-12", Crowding::Seated)]),
                card("7", Vec::new()),
            ]),
            last_updated: None,
        };
        let mut elements = HashMap::new();
        elements.insert(
            "next-12".to_string(),
            Element {
                text: "2m 5s".into(),
                urgency: Urgency::Warning,
            },
        );

        let out = BoardTemplate::from_state("Bus timings", false, &state, &elements)
            .render()
            .unwrap();

        assert!(out.contains("== Bus timings: 01012 =="));
        assert!(out.contains("Bus 12 (SBST)"));
        assert!(out.contains("2m 5s"));
        assert!(out.contains("warning"));
        assert!(out.contains("🪑 Seats available"));
        assert!(out.contains("DD WAB"));
        assert!(out.contains("Bus 7 (SBST)\n  No timing available"));
        assert!(!out.contains("Last updated"));
    }

    #[test]
    fn board_renders_message() {
        let state = PanelState {
            selected: None,
            content: BoardContent::Message("No bus timings available.".into()),
            last_updated: None,
        };
        let out = BoardTemplate::from_state("Bus timings", true, &state, &HashMap::new())
            .render()
            .unwrap();

        assert!(out.contains("Loading..."));
        assert!(out.contains("No bus timings available."));
    }

    #[test]
    fn detached_slot_shows_expired() {
        let view = SlotView::from_card(&slot("next-1", Crowding::Unknown), &HashMap::new());
        assert_eq!(view.text, "NA");
        assert_eq!(view.crowding, "");
        assert_eq!(view.tone, "");
    }

    #[test]
    fn stop_list_shows_distance_in_metres() {
        let ranked = RankedStop {
            stop: StopRecord::new(
                StopCode::parse("01012").unwrap(),
                "Hotel Grand Pacific",
                Coordinates::new(1.29685, 103.854).unwrap(),
            )
            .with_road("Victoria St"),
            distance_km: 0.0424,
        };
        let out = StopListTemplate {
            loading: false,
            status: "Geolocation updated.".into(),
            stops: vec![StopView::from_ranked(0, &ranked)],
        }
        .render()
        .unwrap();

        assert!(out.contains("Geolocation updated."));
        assert!(out.contains("1. Hotel Grand Pacific (01012, Dist: 42m) - Victoria St"));
    }

    #[test]
    fn favorites_list_is_numbered() {
        let favorites = [
            FavoriteStop::new(StopCode::parse("01012").unwrap(), "Hotel Grand Pacific"),
            FavoriteStop::new(StopCode::parse("01013").unwrap(), "St. Joseph's Ch"),
        ];
        let out = FavoritesTemplate {
            favorites: favorites
                .iter()
                .enumerate()
                .map(|(i, f)| FavoriteView::from_favorite(i, f))
                .collect(),
        }
        .render()
        .unwrap();

        assert!(out.contains("1. Hotel Grand Pacific (01012)"));
        assert!(out.contains("2. St. Joseph's Ch (01013)"));
    }

    #[test]
    fn empty_favorites() {
        let out = FavoritesTemplate { favorites: vec![] }.render().unwrap();
        assert!(out.contains("No favourite stops saved."));
    }
}
