//! Application configuration.
//!
//! Defaults are overridden by `NEARBY_BUSES_*` environment variables and
//! then by command-line flags.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::countdown::CountdownFloor;
use crate::domain::{Coordinates, InvalidCoordinates};
use crate::favorites::{DEFAULT_CAPACITY, FavoritesConfig};
use crate::feed::FeedConfig;
use crate::locator::DEFAULT_LOCATE_TIMEOUT;
use crate::nearby::DEFAULT_NEAREST;

/// Prefix of every environment variable read by [`AppConfig::from_env`].
pub const ENV_PREFIX: &str = "NEARBY_BUSES_";

/// Errors building the configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: String, value: String },

    #[error("latitude and longitude must be given together")]
    IncompletePosition,

    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),
}

/// Everything needed to build an [`App`](crate::app::App).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub feed: FeedConfig,
    /// How many stops the nearby list shows.
    pub nearest_count: usize,
    pub favorites_path: PathBuf,
    pub favorites_capacity: usize,
    /// Fixed device position; takes precedence over `position_file`.
    pub position: Option<Coordinates>,
    /// Geolocation result document to read the position from.
    pub position_file: Option<PathBuf>,
    pub locate_timeout_secs: u64,
    /// Countdowns below minus this many minutes show `NA`.
    pub countdown_floor_mins: i64,
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_lookup(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps full variable names to
    /// values.
    pub fn with_env_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            let var = format!("{ENV_PREFIX}{name}");
            lookup(&var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (var, value))
        };

        if let Some((_, url)) = get("STOPS_URL") {
            self.feed = self.feed.with_stops_url(url);
        }
        if let Some((_, url)) = get("ARRIVALS_URL") {
            self.feed = self.feed.with_arrivals_url(url);
        }
        if let Some((var, value)) = get("TIMEOUT_SECS") {
            self.feed = self.feed.with_timeout(parse_number(&var, &value)?);
        }
        if let Some((var, value)) = get("NEAREST") {
            self.nearest_count = parse_number(&var, &value)?;
        }
        if let Some((_, path)) = get("FAVORITES") {
            self.favorites_path = PathBuf::from(path);
        }
        if let Some((var, value)) = get("FAVORITES_CAPACITY") {
            self.favorites_capacity = parse_number(&var, &value)?;
        }
        if let Some((var, value)) = get("COUNTDOWN_FLOOR_MINS") {
            self.countdown_floor_mins = parse_number(&var, &value)?;
        }
        if let Some((_, path)) = get("POSITION_FILE") {
            self.position_file = Some(PathBuf::from(path));
        }

        match (get("LAT"), get("LON")) {
            (None, None) => {}
            (Some((lat_var, lat)), Some((lon_var, lon))) => {
                let lat = parse_number(&lat_var, &lat)?;
                let lon = parse_number(&lon_var, &lon)?;
                self.position = Some(Coordinates::new(lat, lon)?);
            }
            _ => return Err(ConfigError::IncompletePosition),
        }

        Ok(self)
    }

    pub fn with_feed(mut self, feed: FeedConfig) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_nearest_count(mut self, count: usize) -> Self {
        self.nearest_count = count;
        self
    }

    pub fn with_favorites_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.favorites_path = path.into();
        self
    }

    pub fn with_favorites_capacity(mut self, capacity: usize) -> Self {
        self.favorites_capacity = capacity;
        self
    }

    pub fn with_position(mut self, position: Coordinates) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_position_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.position_file = Some(path.into());
        self
    }

    pub fn with_locate_timeout(mut self, secs: u64) -> Self {
        self.locate_timeout_secs = secs;
        self
    }

    pub fn with_countdown_floor(mut self, minutes: i64) -> Self {
        self.countdown_floor_mins = minutes;
        self
    }

    pub fn favorites(&self) -> FavoritesConfig {
        FavoritesConfig::new(&self.favorites_path).with_capacity(self.favorites_capacity)
    }

    pub fn locate_timeout(&self) -> Duration {
        Duration::from_secs(self.locate_timeout_secs)
    }

    pub fn countdown_floor(&self) -> CountdownFloor {
        CountdownFloor::from_minutes(self.countdown_floor_mins)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            nearest_count: DEFAULT_NEAREST,
            favorites_path: PathBuf::from("favorites.json"),
            favorites_capacity: DEFAULT_CAPACITY,
            position: None,
            position_file: None,
            locate_timeout_secs: DEFAULT_LOCATE_TIMEOUT.as_secs(),
            countdown_floor_mins: CountdownFloor::default().minutes(),
        }
    }
}

fn parse_number<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        var: var.to_string(),
        value: value.to_string(),
    })
}
