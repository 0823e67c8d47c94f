//! Favourite stops, persisted in a local JSON document.

mod error;
mod storage;
mod store;

pub use error::FavoritesError;
pub use storage::LocalStorage;
pub use store::{
    AssumeYes, Confirm, DEFAULT_CAPACITY, FAVORITES_KEY, FavoriteStop, FavoritesConfig, FavoritesStore,
    SaveOutcome,
};
