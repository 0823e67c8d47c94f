//! Per-panel view state.
//!
//! The client has two independent panels, nearby and favourites. Each owns
//! its loading indicator, request generation, element surface and
//! countdown timers; nothing is shared through module-level state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::{DateTime, Local};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::countdown::CountdownSet;
use crate::domain::{ArrivalRank, BusType, Crowding, ServiceNo, StopCode};

use super::surface::Surface;

/// Which panel a stop was selected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Nearby,
    Favorites,
}

impl PanelKind {
    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Nearby => "Bus timings",
            PanelKind::Favorites => "Favourite stop timings",
        }
    }

    /// The panel that is cleared when this one renders.
    pub fn other(self) -> Self {
        match self {
            PanelKind::Nearby => PanelKind::Favorites,
            PanelKind::Favorites => PanelKind::Nearby,
        }
    }
}

/// Shared "loading" indicator.
///
/// Counts outstanding requests; it stays visible until the last one is done.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator(Arc<AtomicUsize>);

impl LoadingIndicator {
    /// Show the indicator until the returned guard is dropped.
    pub fn show(&self) -> LoadingGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(self)
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

/// Releases its share of the indicator on drop, whichever way the action
/// ended.
#[must_use = "the indicator hides as soon as the guard is dropped"]
pub struct LoadingGuard<'a>(&'a LoadingIndicator);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        (self.0).0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Identifies one arrivals request made for a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic request counter; only the newest ticket may render.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    /// Issue a ticket newer than every ticket issued before.
    pub fn issue(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}

/// One arrival slot on the board. Its text lives on the panel surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCard {
    pub element_id: String,
    pub rank: ArrivalRank,
    pub crowding: Crowding,
    pub bus_type: BusType,
    pub wheelchair_accessible: bool,
}

/// One service on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCard {
    pub service_no: ServiceNo,
    pub operator: Option<String>,
    pub slots: Vec<SlotCard>,
}

/// What the arrivals area of a panel shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BoardContent {
    #[default]
    Empty,
    /// A static message: no timings, or an error.
    Message(String),
    Services(Vec<ServiceCard>),
}

/// Mutable part of a panel, guarded as a unit.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub selected: Option<StopCode>,
    pub content: BoardContent,
    pub last_updated: Option<DateTime<Local>>,
}

/// A display region with its own arrivals board.
#[derive(Debug)]
pub struct Panel {
    kind: PanelKind,
    loading: LoadingIndicator,
    generation: Generation,
    surface: Surface,
    countdowns: CountdownSet,
    state: RwLock<PanelState>,
    render: Mutex<()>,
}

impl Panel {
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            loading: LoadingIndicator::default(),
            generation: Generation::default(),
            surface: Surface::new(),
            countdowns: CountdownSet::new(),
            state: RwLock::new(PanelState::default()),
            render: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn countdowns(&self) -> &CountdownSet {
        &self.countdowns
    }

    pub fn state(&self) -> &RwLock<PanelState> {
        &self.state
    }

    /// Exclusive right to change what the board shows.
    ///
    /// Held across the ticket check and the whole render, so two responses
    /// never interleave their elements and timers.
    pub async fn begin_render(&self) -> MutexGuard<'_, ()> {
        self.render.lock().await
    }

    /// Stop all timers and blank the board, as when another panel takes over.
    pub async fn clear(&self) {
        self.countdowns.cancel_all();
        self.surface.clear().await;
        let mut state = self.state.write().await;
        state.content = BoardContent::Empty;
        state.last_updated = None;
    }

    /// Replace the board with a static message; timers are stopped.
    pub async fn show_message(&self, message: impl Into<String>) {
        self.countdowns.cancel_all();
        self.surface.clear().await;
        self.state.write().await.content = BoardContent::Message(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_guard_hides_on_drop() {
        let loading = LoadingIndicator::default();
        assert!(!loading.is_visible());
        {
            let _guard = loading.show();
            assert!(loading.is_visible());
        }
        assert!(!loading.is_visible());
    }

    #[test]
    fn loading_stays_visible_until_last_guard_drops() {
        let loading = LoadingIndicator::default();
        let older = loading.show();
        let newer = loading.show();

        drop(older);
        assert!(loading.is_visible());
        drop(newer);
        assert!(!loading.is_visible());
    }

    #[test]
    fn loading_guard_hides_on_early_return() {
        fn fails(loading: &LoadingIndicator) -> Result<(), ()> {
            let _guard = loading.show();
            Err(())
        }

        let loading = LoadingIndicator::default();
        assert!(fails(&loading).is_err());
        assert!(!loading.is_visible());
    }

    #[test]
    fn only_latest_ticket_is_current() {
        let generation = Generation::default();
        let first = generation.issue();
        assert!(generation.is_current(first));

        let second = generation.issue();
        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[tokio::test]
    async fn clear_resets_board() {
        let panel = Panel::new(PanelKind::Favorites);
        {
            let mut state = panel.state().write().await;
            state.content = BoardContent::Message("No bus timings available.".into());
            state.last_updated = Some(Local::now());
        }

        panel.clear().await;

        let state = panel.state().read().await;
        assert_eq!(state.content, BoardContent::Empty);
        assert!(state.last_updated.is_none());
    }

    #[test]
    fn other_panel() {
        assert_eq!(PanelKind::Nearby.other(), PanelKind::Favorites);
        assert_eq!(PanelKind::Favorites.other(), PanelKind::Nearby);
    }
}
