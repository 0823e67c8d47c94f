//! Arrival estimates and the code tables used to display them.

use chrono::{DateTime, Utc};

/// Position of an estimate within a service's upcoming arrivals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArrivalRank {
    Next,
    Subsequent,
    Third,
}

impl ArrivalRank {
    /// All ranks in chronological order.
    pub const ALL: [ArrivalRank; 3] = [Self::Next, Self::Subsequent, Self::Third];

    /// Tag used to build element identifiers (`{tag}-{service}`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Subsequent => "sub",
            Self::Third => "next3",
        }
    }
}

/// Coarse colour used alongside a crowding glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Orange,
    Red,
    None,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::None => "",
        }
    }
}

/// Occupancy of an arriving bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crowding {
    /// `SEA`: seats available.
    Seated,
    /// `SDA`: standing available.
    StandingAvailable,
    /// `LSD`: limited standing.
    LimitedStanding,
    Unknown,
}

type CrowdingEntry = (&'static str, Crowding, &'static str, Tone, &'static str);

/// Code → (variant, glyph, tone, label). The only place these codes are interpreted.
static CROWDING_TABLE: [CrowdingEntry; 3] = [
    ("SEA", Crowding::Seated, "🪑", Tone::Green, "Seats available"),
    (
        "SDA",
        Crowding::StandingAvailable,
        "🧍",
        Tone::Orange,
        "Standing available",
    ),
    (
        "LSD",
        Crowding::LimitedStanding,
        "🧍🧍",
        Tone::Red,
        "Limited standing",
    ),
];

impl Crowding {
    /// Map a feed `load` code; anything unrecognised is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        CROWDING_TABLE
            .iter()
            .find(|(c, ..)| *c == code)
            .map(|(_, crowding, ..)| *crowding)
            .unwrap_or(Crowding::Unknown)
    }

    fn entry(self) -> Option<&'static CrowdingEntry> {
        CROWDING_TABLE.iter().find(|(_, c, ..)| *c == self)
    }

    pub fn glyph(self) -> &'static str {
        self.entry().map_or("", |(_, _, glyph, ..)| *glyph)
    }

    pub fn tone(self) -> Tone {
        self.entry().map_or(Tone::None, |(_, _, _, tone, _)| *tone)
    }

    pub fn label(self) -> &'static str {
        self.entry().map_or("", |(.., label)| *label)
    }
}

/// Vehicle type reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusType {
    SingleDeck,
    DoubleDeck,
    Bendy,
    /// Any other code, kept verbatim (may be empty).
    Other(String),
}

impl BusType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "SD" => Self::SingleDeck,
            "DD" => Self::DoubleDeck,
            "BD" => Self::Bendy,
            other => Self::Other(other.to_string()),
        }
    }

    /// The raw feed code, shown as a badge.
    pub fn code(&self) -> &str {
        match self {
            Self::SingleDeck => "SD",
            Self::DoubleDeck => "DD",
            Self::Bendy => "BD",
            Self::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::SingleDeck => "Single deck",
            Self::DoubleDeck => "Double deck",
            Self::Bendy => "Bendy",
            Self::Other(code) => code,
        }
    }
}

/// One predicted arrival of a service at the selected stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalEstimate {
    pub rank: ArrivalRank,
    pub arrival_time: DateTime<Utc>,
    pub crowding: Crowding,
    pub bus_type: BusType,
    pub wheelchair_accessible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_tags() {
        let tags: Vec<_> = ArrivalRank::ALL.iter().map(|r| r.tag()).collect();
        assert_eq!(tags, ["next", "sub", "next3"]);
    }

    #[test]
    fn crowding_codes() {
        assert_eq!(Crowding::from_code("SEA"), Crowding::Seated);
        assert_eq!(Crowding::from_code("SDA"), Crowding::StandingAvailable);
        assert_eq!(Crowding::from_code("LSD"), Crowding::LimitedStanding);
        assert_eq!(Crowding::from_code(""), Crowding::Unknown);
        assert_eq!(Crowding::from_code("sea"), Crowding::Unknown);
    }

    #[test]
    fn crowding_display_table() {
        assert_eq!(Crowding::Seated.glyph(), "🪑");
        assert_eq!(Crowding::Seated.tone(), Tone::Green);
        assert_eq!(Crowding::StandingAvailable.glyph(), "🧍");
        assert_eq!(Crowding::StandingAvailable.tone(), Tone::Orange);
        assert_eq!(Crowding::LimitedStanding.glyph(), "🧍🧍");
        assert_eq!(Crowding::LimitedStanding.tone(), Tone::Red);

        assert_eq!(Crowding::Unknown.glyph(), "");
        assert_eq!(Crowding::Unknown.tone(), Tone::None);
        assert_eq!(Crowding::Unknown.label(), "");
    }

    #[test]
    fn bus_type_keeps_unknown_codes() {
        assert_eq!(BusType::from_code("DD"), BusType::DoubleDeck);
        assert_eq!(BusType::from_code("DD").label(), "Double deck");

        let other = BusType::from_code("XL");
        assert_eq!(other.code(), "XL");
        assert_eq!(other.label(), "XL");
    }
}
