//! Domain types for the subway network.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity. Nothing in here does I/O.

mod error;
mod line;
mod path;
mod section;
mod station;

pub use error::ValidationError;
pub use line::{Line, LineColor, LineId, LineName};
pub use path::SectionPath;
pub use section::{Distance, Section};
pub use station::{Station, StationId, StationName};
