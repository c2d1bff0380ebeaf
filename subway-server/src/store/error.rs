//! Store error types.

use crate::domain::ValidationError;

/// Errors from reading or mutating the network.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain rule rejected the change
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced entity does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// A unique name is already taken
    #[error("{0}")]
    Conflict(String),

    /// Every id of this kind has been handed out
    #[error("no {0} ids left")]
    IdsExhausted(&'static str),

    /// Reading or writing the snapshot file failed
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl StoreError {
    pub(crate) fn station_not_found(id: u64) -> Self {
        StoreError::NotFound {
            entity: "station",
            id,
        }
    }

    pub(crate) fn line_not_found(id: u64) -> Self {
        StoreError::NotFound {
            entity: "line",
            id,
        }
    }
}
