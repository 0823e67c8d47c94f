//! Bounded, de-duplicated list of favourite stops.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::FavoritesError;
use super::storage::LocalStorage;
use crate::domain::StopCode;

/// Storage key holding the favourites list.
pub const FAVORITES_KEY: &str = "favoriteBusStops";

/// Default number of favourites kept.
pub const DEFAULT_CAPACITY: usize = 3;

/// A saved stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteStop {
    pub code: StopCode,
    pub name: String,
}

impl FavoriteStop {
    pub fn new(code: StopCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

/// Result of [`FavoritesStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A favourite with the same code already exists; nothing changed.
    AlreadySaved,
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Approves everything (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Configuration for the favourites store.
#[derive(Debug, Clone)]
pub struct FavoritesConfig {
    pub path: PathBuf,
    pub capacity: usize,
}

impl FavoritesConfig {
    /// Store at `path` with the default capacity.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Set a custom capacity (at least one).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self::new("favorites.json")
    }
}

/// Favourite stops persisted under [`FAVORITES_KEY`].
///
/// The list is ordered oldest first. Saving beyond capacity evicts the oldest
/// entry; saving a code that is already present changes nothing.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    storage: LocalStorage,
    capacity: usize,
}

impl FavoritesStore {
    pub fn new(config: FavoritesConfig) -> Self {
        Self {
            storage: LocalStorage::new(config.path),
            capacity: config.capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Everything persisted, including entries beyond capacity if the
    /// document was edited by hand. Missing document → empty list.
    pub fn load_all(&self) -> Result<Vec<FavoriteStop>, FavoritesError> {
        Ok(self
            .storage
            .get_item::<Vec<FavoriteStop>>(FAVORITES_KEY)?
            .unwrap_or_default())
    }

    /// The favourites shown to the user: the newest `capacity` entries,
    /// oldest first.
    pub fn list(&self) -> Result<Vec<FavoriteStop>, FavoritesError> {
        let mut all = self.load_all()?;
        let excess = all.len().saturating_sub(self.capacity);
        all.drain(..excess);
        Ok(all)
    }

    /// Save a stop, skipping it if its code is already saved.
    pub fn save(&self, code: StopCode, name: impl Into<String>) -> Result<SaveOutcome, FavoritesError> {
        let mut all = self.load_all()?;

        if all.iter().any(|f| f.code == code) {
            debug!(%code, "favourite already saved");
            return Ok(SaveOutcome::AlreadySaved);
        }

        all.push(FavoriteStop::new(code.clone(), name));
        let excess = all.len().saturating_sub(self.capacity);
        for evicted in all.drain(..excess) {
            info!(code = %evicted.code, "evicted oldest favourite");
        }

        self.storage.set_item(FAVORITES_KEY, &all)?;
        info!(%code, "saved favourite");
        Ok(SaveOutcome::Saved)
    }

    /// Remove the favourite at `index` in [`list`](Self::list) once the user
    /// confirms.
    pub fn remove(&self, index: usize, confirm: &impl Confirm) -> Result<FavoriteStop, FavoritesError> {
        let mut all = self.load_all()?;
        let visible = all.len().min(self.capacity);
        if index >= visible {
            return Err(FavoritesError::IndexOutOfRange {
                index,
                len: visible,
            });
        }

        let position = all.len() - visible + index;
        let name = all[position].name.clone();
        let prompt = format!("Are you sure you want to remove {name} from favorites?");
        if !confirm.confirm(&prompt) {
            return Err(FavoritesError::Declined { name });
        }

        let removed = all.remove(position);
        self.storage.set_item(FAVORITES_KEY, &all)?;
        info!(code = %removed.code, "removed favourite");
        Ok(removed)
    }

    /// The favourite at `index` in [`list`](Self::list).
    pub fn get(&self, index: usize) -> Result<FavoriteStop, FavoritesError> {
        let mut visible = self.list()?;
        let len = visible.len();
        if index >= len {
            return Err(FavoritesError::IndexOutOfRange { index, len });
        }
        Ok(visible.swap_remove(index))
    }
}
