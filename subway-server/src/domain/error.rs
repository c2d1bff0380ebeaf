//! Domain error types.
//!
//! Every rule the domain enforces fails with a [`ValidationError`]. Callers
//! translate it into a client-visible failure; nothing here is retried.

use super::StationId;

/// A domain rule was violated. No state was changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Station or line name is blank
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Line color is blank
    #[error("line color must not be empty")]
    EmptyColor,

    /// Section distance is zero or negative
    #[error("section distance must be positive, got {0}")]
    NonPositiveDistance(i64),

    /// Section distance does not fit the stored width
    #[error("section distance must be at most {max}, got {0}", max = u32::MAX)]
    DistanceTooLarge(i64),

    /// Section starts and ends at the same station
    #[error("section up-station and down-station must differ (both {0})")]
    SameStation(StationId),

    /// Appended section does not continue from the terminus
    #[error("new section's up-station must equal the line's current terminal down-station")]
    NotContiguous,

    /// Appended section would revisit a station
    #[error("new section's down-station must not already belong to the line")]
    StationAlreadyOnLine,

    /// Removal would leave the line without sections
    #[error("a line with only one section cannot have its terminus removed")]
    SingleSection,

    /// Removal targets something other than the terminus
    #[error("only the line's current terminal down-station may be removed")]
    NotTerminus,

    /// A path must start with at least one section
    #[error("a line must have at least one section")]
    EmptyPath,

    /// Station is still referenced by a line
    #[error("station {0} belongs to a line and cannot be deleted")]
    StationInUse(StationId),
}
