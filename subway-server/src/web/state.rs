//! Application state for the web layer.

use crate::store::Store;

/// Shared application state.
///
/// Cheap to clone; the store is reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// Stations, lines and their sections
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
