//! Subway lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Section, SectionPath, StationId, ValidationError};

/// Identifier of a line, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-blank line name, e.g. "Sinbundang".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineName(String);

impl LineName {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName("line"));
        }
        Ok(LineName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineName {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        LineName::parse(&s)
    }
}

impl From<LineName> for String {
    fn from(name: LineName) -> Self {
        name.0
    }
}

impl fmt::Display for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display color of a line. Free-form but never blank (e.g. "bg-red-600").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineColor(String);

impl LineColor {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyColor);
        }
        Ok(LineColor(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineColor {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        LineColor::parse(&s)
    }
}

impl From<LineColor> for String {
    fn from(color: LineColor) -> Self {
        color.0
    }
}

/// A line and the path its trains run along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: LineName,
    pub color: LineColor,
    sections: SectionPath,
}

impl Line {
    /// Create a line with its initial section.
    pub fn new(id: LineId, name: LineName, color: LineColor, first: Section) -> Self {
        Self {
            id,
            name,
            color,
            sections: SectionPath::new(first),
        }
    }

    pub fn path(&self) -> &SectionPath {
        &self.sections
    }

    /// Append a section at the terminus. See [`SectionPath::append`].
    pub fn add_section(&mut self, section: Section) -> Result<(), ValidationError> {
        self.sections.append(section)
    }

    /// Remove the terminus. See [`SectionPath::remove_terminus`].
    pub fn remove_station(&mut self, station: StationId) -> Result<Section, ValidationError> {
        self.sections.remove_terminus(station)
    }

    pub fn serves(&self, station: StationId) -> bool {
        self.sections.contains(station)
    }
}
