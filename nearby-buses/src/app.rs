//! The client: locate, list nearby stops, show live arrivals, manage
//! favourites.
//!
//! [`App`] owns both panels and everything they draw from. Every method
//! takes `&self`, so actions can overlap (a second stop selected while the
//! first is still loading); the per-panel generation counter decides which
//! response gets rendered.

use askama::Template;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::countdown::CountdownContext;
use crate::domain::{RankedStop, StopCode, StopRecord};
use crate::favorites::{Confirm, FavoriteStop, FavoritesError, FavoritesStore, SaveOutcome};
use crate::feed::{FetchError, TransitFeed};
use crate::locator::{LocationError, Locator, PositionSource};
use crate::nearby::rank_nearest_stops;
use crate::view::{
    BoardTemplate, FavoriteView, FavoritesTemplate, Panel, PanelKind, StopListTemplate, StopView,
    render_arrivals,
};

/// Status shown after the nearby list was refreshed.
pub const LOCATED_STATUS: &str = "Geolocation updated.";

/// Status shown when the stop registry could not be fetched.
pub const STOPS_FAILED: &str = "Failed to fetch bus stops data.";

/// Board message shown when arrivals could not be fetched.
pub const ARRIVALS_FAILED: &str = "Failed to fetch bus timings.";

/// Errors from app actions. The affected panel already shows a message by
/// the time one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    #[error("no nearby stop at position {index} (have {len})")]
    NoSuchNearbyStop { index: usize, len: usize },

    #[error("failed to render: {0}")]
    Render(#[from] askama::Error),
}

/// The nearby stop list and its status line.
#[derive(Debug, Clone, Default)]
pub struct StopList {
    pub status: String,
    pub stops: Vec<RankedStop>,
}

pub struct App<F, S> {
    feed: F,
    locator: Locator<S>,
    favorites: FavoritesStore,
    nearest_count: usize,
    countdown: CountdownContext,
    stops: RwLock<StopList>,
    nearby: Panel,
    favorites_panel: Panel,
}

impl<F: TransitFeed, S: PositionSource> App<F, S> {
    pub fn new(
        feed: F,
        locator: Locator<S>,
        favorites: FavoritesStore,
        nearest_count: usize,
        countdown: CountdownContext,
    ) -> Self {
        Self {
            feed,
            locator,
            favorites,
            nearest_count,
            countdown,
            stops: RwLock::new(StopList::default()),
            nearby: Panel::new(PanelKind::Nearby),
            favorites_panel: Panel::new(PanelKind::Favorites),
        }
    }

    pub fn panel(&self, kind: PanelKind) -> &Panel {
        match kind {
            PanelKind::Nearby => &self.nearby,
            PanelKind::Favorites => &self.favorites_panel,
        }
    }

    pub async fn stop_list(&self) -> StopList {
        self.stops.read().await.clone()
    }

    async fn set_stop_list(&self, status: &str, stops: Vec<RankedStop>) {
        let mut list = self.stops.write().await;
        list.status = status.to_string();
        list.stops = stops;
    }

    /// Locate the device and refresh the nearby stop list.
    ///
    /// Returns how many stops are listed.
    pub async fn locate_nearby(&self) -> Result<usize, AppError> {
        let loading = self.nearby.loading();

        let position = match self.locator.locate(loading).await {
            Ok(position) => position,
            Err(e) => {
                self.set_stop_list(&e.to_string(), Vec::new()).await;
                return Err(e.into());
            }
        };

        let registry = {
            let _loading = loading.show();
            self.feed.fetch_stops().await
        };
        let registry = match registry {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "failed to fetch stop registry");
                self.set_stop_list(STOPS_FAILED, Vec::new()).await;
                return Err(e.into());
            }
        };

        let nearest = rank_nearest_stops(position, &registry, self.nearest_count);
        info!(
            registry = registry.len(),
            listed = nearest.len(),
            "updated nearby stops"
        );
        let count = nearest.len();
        self.set_stop_list(LOCATED_STATUS, nearest).await;
        Ok(count)
    }

    /// Fetch and render arrivals for `stop` into the `kind` panel.
    ///
    /// A response that arrives after a newer selection on the same panel is
    /// dropped. Rendering into one panel blanks the other.
    pub async fn select_stop(&self, kind: PanelKind, stop: StopCode) -> Result<(), AppError> {
        let panel = self.panel(kind);
        let ticket = panel.generation().issue();

        let result = {
            let _loading = panel.loading().show();
            self.feed.fetch_arrivals(&stop).await
        };

        let _render = panel.begin_render().await;
        if !panel.generation().is_current(ticket) {
            warn!(panel = ?kind, %stop, "discarding stale arrivals response");
            return Ok(());
        }

        match result {
            Ok(services) => {
                self.panel(kind.other()).clear().await;
                render_arrivals(panel, &stop, services, &self.countdown).await;
                Ok(())
            }
            Err(e) => {
                warn!(panel = ?kind, %stop, error = %e, "failed to fetch arrivals");
                panel.show_message(ARRIVALS_FAILED).await;
                panel.state().write().await.selected = Some(stop);
                Err(e.into())
            }
        }
    }

    /// Select the nearby stop at 0-based `index`.
    pub async fn select_nearby(&self, index: usize) -> Result<(), AppError> {
        let stop = self.nearby_stop(index).await?;
        self.select_stop(PanelKind::Nearby, stop.code).await
    }

    /// Select the favourite at 0-based `index`.
    pub async fn select_favorite(&self, index: usize) -> Result<(), AppError> {
        let favorite = self.favorites.get(index)?;
        self.select_stop(PanelKind::Favorites, favorite.code).await
    }

    async fn nearby_stop(&self, index: usize) -> Result<StopRecord, AppError> {
        let list = self.stops.read().await;
        list.stops
            .get(index)
            .map(|ranked| ranked.stop.clone())
            .ok_or(AppError::NoSuchNearbyStop {
                index,
                len: list.stops.len(),
            })
    }

    pub fn save_favorite(&self, code: StopCode, name: &str) -> Result<SaveOutcome, AppError> {
        Ok(self.favorites.save(code, name)?)
    }

    /// Save the nearby stop at 0-based `index` as a favourite.
    pub async fn save_nearby_favorite(&self, index: usize) -> Result<SaveOutcome, AppError> {
        let stop = self.nearby_stop(index).await?;
        self.save_favorite(stop.code, &stop.name)
    }

    pub fn remove_favorite(
        &self,
        index: usize,
        confirm: &impl Confirm,
    ) -> Result<FavoriteStop, AppError> {
        Ok(self.favorites.remove(index, confirm)?)
    }

    pub fn favorites(&self) -> Result<Vec<FavoriteStop>, AppError> {
        Ok(self.favorites.list()?)
    }

    /// Find a stop in the registry by code.
    pub async fn lookup_stop(&self, code: &StopCode) -> Result<Option<StopRecord>, AppError> {
        let registry = self.feed.fetch_stops().await?;
        Ok(registry.into_iter().find(|stop| &stop.code == code))
    }

    pub async fn draw_stop_list(&self) -> Result<String, AppError> {
        let list = self.stops.read().await;
        let template = StopListTemplate {
            loading: self.nearby.loading().is_visible(),
            status: list.status.clone(),
            stops: list
                .stops
                .iter()
                .enumerate()
                .map(|(i, ranked)| StopView::from_ranked(i, ranked))
                .collect(),
        };
        Ok(template.render()?)
    }

    pub fn draw_favorites(&self) -> Result<String, AppError> {
        let template = FavoritesTemplate {
            favorites: self
                .favorites
                .list()?
                .iter()
                .enumerate()
                .map(|(i, favorite)| FavoriteView::from_favorite(i, favorite))
                .collect(),
        };
        Ok(template.render()?)
    }

    pub async fn draw_board(&self, kind: PanelKind) -> Result<String, AppError> {
        let panel = self.panel(kind);
        let elements = panel.surface().snapshot().await;
        let state = panel.state().read().await;
        let template = BoardTemplate::from_state(
            kind.title(),
            panel.loading().is_visible(),
            &state,
            &elements,
        );
        Ok(template.render()?)
    }

    /// The whole screen: nearby stops, favourites, then both boards.
    pub async fn draw(&self) -> Result<String, AppError> {
        let mut screen = self.draw_stop_list().await?;
        screen.push('\n');
        screen.push_str(&self.draw_favorites()?);
        for kind in [PanelKind::Nearby, PanelKind::Favorites] {
            screen.push('\n');
            screen.push_str(&self.draw_board(kind).await?);
        }
        Ok(screen)
    }

    /// Stop every countdown.
    pub fn shutdown(&self) {
        self.nearby.countdowns().cancel_all();
        self.favorites_panel.countdowns().cancel_all();
    }
}
