//! Terminal view: panels, their live elements and the text templates.

mod board;
mod panel;
mod surface;
mod templates;

pub use board::{NO_TIMING_FOR_SERVICE, NO_TIMINGS, element_id, render_arrivals};
pub use panel::{
    BoardContent, Generation, LoadingGuard, LoadingIndicator, Panel, PanelKind, PanelState,
    ServiceCard, SlotCard, Ticket,
};
pub use surface::{Element, Surface};
pub use templates::{
    BoardTemplate, FavoriteView, FavoritesTemplate, ServiceView, SlotView, StopListTemplate, StopView,
};
