//! Station types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Identifier of a station, assigned by the store on creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-blank station display name.
///
/// Surrounding whitespace is trimmed. Uniqueness is the store's concern.
///
/// # Examples
///
/// ```
/// use subway_server::domain::StationName;
///
/// let name = StationName::parse("  Gangnam ").unwrap();
/// assert_eq!(name.as_str(), "Gangnam");
///
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationName(String);

impl StationName {
    /// Parse a station name, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName("station"));
        }
        Ok(StationName(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationName {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StationName::parse(&s)
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A station on the network.
///
/// Two stations are the same station when their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: StationName,
}

impl Station {
    pub fn new(id: StationId, name: StationName) -> Self {
        Self { id, name }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}
