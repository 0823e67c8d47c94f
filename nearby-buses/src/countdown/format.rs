//! Countdown text, urgency and the expiry floor.

use chrono::{DateTime, Duration, Utc};

/// Text shown once a countdown has passed the floor.
pub const EXPIRED_TEXT: &str = "NA";

/// Format the signed time left until `target`.
///
/// `"2m 5s"` for 125 s ahead, `"-30s"` for 30 s behind. Seconds are
/// truncated, not rounded.
pub fn format_time_left(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (target - now).num_milliseconds();
    let total_secs = diff_ms.unsigned_abs() / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let sign = if diff_ms < 0 { "-" } else { "" };

    if minutes == 0 {
        format!("{sign}{seconds}s")
    } else {
        format!("{sign}{minutes}m {seconds}s")
    }
}

/// How soon a bus is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Two minutes or less (including already departed).
    Urgent,
    /// Five minutes or less.
    Warning,
    Safe,
}

impl Urgency {
    pub fn from_remaining(remaining: Duration) -> Self {
        let minutes = remaining.num_milliseconds() as f64 / 60_000.0;
        if minutes <= 2.0 {
            Urgency::Urgent
        } else if minutes <= 5.0 {
            Urgency::Warning
        } else {
            Urgency::Safe
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Urgent => "urgent",
            Urgency::Warning => "warning",
            Urgency::Safe => "safe",
        }
    }
}

/// How far past its arrival a countdown keeps running.
///
/// Past the floor the slot shows [`EXPIRED_TEXT`] and the timer stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownFloor(Duration);

impl CountdownFloor {
    pub fn from_minutes(minutes: i64) -> Self {
        Self(Duration::minutes(minutes.abs()))
    }

    pub fn minutes(&self) -> i64 {
        self.0.num_minutes()
    }

    /// Whether a countdown with `remaining` time left has expired.
    pub fn is_expired(&self, remaining: Duration) -> bool {
        remaining < -self.0
    }
}

impl Default for CountdownFloor {
    fn default() -> Self {
        Self::from_minutes(10)
    }
}

/// What a countdown slot shows at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    Live { text: String, urgency: Urgency },
    Expired,
}

impl Reading {
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>, floor: CountdownFloor) -> Self {
        let remaining = target - now;
        if floor.is_expired(remaining) {
            Reading::Expired
        } else {
            Reading::Live {
                text: format_time_left(target, now),
                urgency: Urgency::from_remaining(remaining),
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Reading::Live { text, .. } => text,
            Reading::Expired => EXPIRED_TEXT,
        }
    }

    /// Expired slots keep the most urgent styling.
    pub fn urgency(&self) -> Urgency {
        match self {
            Reading::Live { urgency, .. } => *urgency,
            Reading::Expired => Urgency::Urgent,
        }
    }
}
