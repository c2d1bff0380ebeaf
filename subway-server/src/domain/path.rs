//! The ordered chain of sections that makes up a line.

use serde::{Deserialize, Serialize};

use super::{Section, StationId, ValidationError};

/// A contiguous, non-branching chain of sections.
///
/// Each section's up-station is the previous section's down-station, no
/// station appears twice, and there is always at least one section. The only
/// mutations are [`append`](Self::append) at the terminus and
/// [`remove_terminus`](Self::remove_terminus); both check every rule before
/// touching the chain, so a failed call leaves it unchanged.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Distance, Section, SectionPath, StationId};
///
/// let d = Distance::new(5).unwrap();
/// let (a, b, c) = (StationId(1), StationId(2), StationId(3));
///
/// let mut path = SectionPath::new(Section::new(a, b, d).unwrap());
/// path.append(Section::new(b, c, d).unwrap()).unwrap();
/// assert_eq!(path.station_ids(), vec![a, b, c]);
///
/// // Only the terminus can go
/// assert!(path.remove_terminus(b).is_err());
/// path.remove_terminus(c).unwrap();
/// assert_eq!(path.terminus(), b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionPath {
    sections: Vec<Section>,
}

impl SectionPath {
    /// Start a path with its initial section.
    pub fn new(first: Section) -> Self {
        Self {
            sections: vec![first],
        }
    }

    /// Rebuild a path from stored sections, re-checking every rule.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, ValidationError> {
        let mut iter = sections.into_iter();
        let first = iter.next().ok_or(ValidationError::EmptyPath)?;
        let mut path = Self::new(first);
        for section in iter {
            path.append(section)?;
        }
        Ok(path)
    }

    /// Extend the path at its terminus.
    pub fn append(&mut self, section: Section) -> Result<(), ValidationError> {
        if section.up() != self.terminus() {
            return Err(ValidationError::NotContiguous);
        }
        if self.contains(section.down()) {
            return Err(ValidationError::StationAlreadyOnLine);
        }
        self.sections.push(section);
        Ok(())
    }

    /// Drop the last section, provided `station` is the terminus.
    ///
    /// Returns the removed section.
    pub fn remove_terminus(&mut self, station: StationId) -> Result<Section, ValidationError> {
        if self.sections.len() <= 1 {
            return Err(ValidationError::SingleSection);
        }
        if station != self.terminus() {
            return Err(ValidationError::NotTerminus);
        }
        self.sections.pop().ok_or(ValidationError::EmptyPath)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The up-station of the first section.
    pub fn origin(&self) -> StationId {
        self.first().up()
    }

    /// The down-station of the last section.
    pub fn terminus(&self) -> StationId {
        self.last().down()
    }

    /// Whether `station` is on this path.
    pub fn contains(&self, station: StationId) -> bool {
        self.sections.iter().any(|s| s.touches(station))
    }

    /// Station ids in travel order: the origin, then every down-station.
    pub fn station_ids(&self) -> Vec<StationId> {
        std::iter::once(self.origin())
            .chain(self.sections.iter().map(Section::down))
            .collect()
    }

    /// Sum of all section distances.
    pub fn total_distance(&self) -> u64 {
        self.sections
            .iter()
            .map(|s| u64::from(s.distance().get()))
            .sum()
    }

    fn first(&self) -> &Section {
        // Non-empty: every constructor pushes a section and removal stops at one.
        &self.sections[0]
    }

    fn last(&self) -> &Section {
        &self.sections[self.sections.len() - 1]
    }
}

impl TryFrom<Vec<Section>> for SectionPath {
    type Error = ValidationError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        SectionPath::from_sections(sections)
    }
}

impl From<SectionPath> for Vec<Section> {
    fn from(path: SectionPath) -> Self {
        path.sections
    }
}
