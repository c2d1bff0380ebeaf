//! Sections: directed edges between two stations.

use serde::{Deserialize, Serialize};

use super::{StationId, ValidationError};

/// A strictly positive section length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Distance(u32);

impl Distance {
    /// Validate a raw distance.
    ///
    /// Accepts `i64` so that negative request values fail here rather than
    /// during deserialization.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::NonPositiveDistance(value));
        }
        u32::try_from(value)
            .map(Distance)
            .map_err(|_| ValidationError::DistanceTooLarge(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Distance {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Distance::new(value)
    }
}

impl From<Distance> for u32 {
    fn from(d: Distance) -> Self {
        d.0
    }
}

/// A directed edge `up -> down`.
///
/// The two ends are always distinct stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct Section {
    up: StationId,
    down: StationId,
    distance: Distance,
}

impl Section {
    /// Create a section, rejecting a loop back to the same station.
    pub fn new(
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<Self, ValidationError> {
        if up == down {
            return Err(ValidationError::SameStation(up));
        }
        Ok(Self { up, down, distance })
    }

    pub fn up(&self) -> StationId {
        self.up
    }

    pub fn down(&self) -> StationId {
        self.down
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Whether either end of this section is `station`.
    pub fn touches(&self, station: StationId) -> bool {
        self.up == station || self.down == station
    }
}

/// Unvalidated wire shape, so snapshots go through [`Section::new`].
#[derive(Deserialize)]
struct RawSection {
    up: StationId,
    down: StationId,
    distance: Distance,
}

impl TryFrom<RawSection> for Section {
    type Error = ValidationError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Section::new(raw.up, raw.down, raw.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_must_be_positive() {
        assert_eq!(Distance::new(5).unwrap().get(), 5);
        assert_eq!(Distance::new(1).unwrap().get(), 1);
        assert_eq!(
            Distance::new(0),
            Err(ValidationError::NonPositiveDistance(0))
        );
        assert_eq!(
            Distance::new(-3),
            Err(ValidationError::NonPositiveDistance(-3))
        );
    }

    #[test]
    fn distance_too_large_is_rejected() {
        assert_eq!(Distance::new(i64::from(u32::MAX)).unwrap().get(), u32::MAX);
        assert_eq!(
            Distance::new(5_000_000_000),
            Err(ValidationError::DistanceTooLarge(5_000_000_000))
        );
    }

    #[test]
    fn section_rejects_same_station() {
        let d = Distance::new(5).unwrap();
        assert_eq!(
            Section::new(StationId(1), StationId(1), d),
            Err(ValidationError::SameStation(StationId(1)))
        );
    }

    #[test]
    fn touches_either_end() {
        let s = Section::new(StationId(1), StationId(2), Distance::new(5).unwrap()).unwrap();
        assert!(s.touches(StationId(1)));
        assert!(s.touches(StationId(2)));
        assert!(!s.touches(StationId(3)));
    }

    #[test]
    fn deserialize_validates() {
        let ok: Section = serde_json::from_str(r#"{"up":1,"down":2,"distance":10}"#).unwrap();
        assert_eq!(ok.up(), StationId(1));
        assert_eq!(ok.down(), StationId(2));
        assert_eq!(ok.distance().get(), 10);

        assert!(serde_json::from_str::<Section>(r#"{"up":1,"down":1,"distance":10}"#).is_err());
        assert!(serde_json::from_str::<Section>(r#"{"up":1,"down":2,"distance":0}"#).is_err());
    }
}
