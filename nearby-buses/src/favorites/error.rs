//! Favourites error types.

/// Errors from the favourites store.
#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// Reading or writing the storage document failed
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage document (or one of its values) is not valid JSON
    #[error("corrupt storage value for {key:?}: {message}")]
    Parse { key: String, message: String },

    /// No favourite at this position
    #[error("no favourite at position {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The user did not confirm the removal
    #[error("removal of {name} was not confirmed")]
    Declined { name: String },
}
