//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Section, Station};
use crate::store::LineView;

/// Request to create a station.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: u64,
    pub name: String,
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: u64,
    pub down_station_id: u64,
    /// Signed so that negative values reach domain validation
    pub distance: i64,
}

/// Request to rename or recolor a line. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct LineUpdateRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Request to append a section to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: i64,
}

/// Query for `DELETE /lines/{id}/sections`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSectionQuery {
    pub station_id: u64,
}

/// A section in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u32,
}

/// A line in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: u64,
    pub name: String,
    pub color: String,

    /// Total length of all sections
    pub distance: u64,

    /// Stations in travel order
    pub stations: Vec<StationResponse>,

    /// Sections in travel order
    pub sections: Vec<SectionResponse>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong
    pub message: String,
}

// Conversion implementations

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.0,
            name: station.name.to_string(),
        }
    }
}

impl From<&Section> for SectionResponse {
    fn from(section: &Section) -> Self {
        Self {
            up_station_id: section.up().0,
            down_station_id: section.down().0,
            distance: section.distance().get(),
        }
    }
}

impl LineResponse {
    /// Build from a line and its stations in travel order.
    pub fn from_line(line: &Line, stations: &[Station]) -> Self {
        Self {
            id: line.id.0,
            name: line.name.to_string(),
            color: line.color.as_str().to_string(),
            distance: line.path().total_distance(),
            stations: stations.iter().map(StationResponse::from).collect(),
            sections: line.path().sections().iter().map(SectionResponse::from).collect(),
        }
    }

    pub fn from_view(view: &LineView) -> Self {
        Self::from_line(&view.line, &view.stations)
    }
}
