//! The in-memory network: stations, lines and the rules that span them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{
    Distance, Line, LineColor, LineId, LineName, Section, Station, StationId, StationName,
    ValidationError,
};

use super::error::StoreError;
use super::snapshot::Snapshot;

/// Input for creating a line with its first section.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: LineName,
    pub color: LineColor,
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: Distance,
}

/// Changes to a line's attributes. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct LineUpdate {
    pub name: Option<LineName>,
    pub color: Option<LineColor>,
}

/// A line together with its stations in travel order, read in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub line: Line,
    pub stations: Vec<Station>,
}

/// Stations and lines keyed by id, plus id counters.
///
/// Every method checks before it writes, so an `Err` means nothing changed.
#[derive(Debug, Clone)]
pub struct Network {
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    next_station_id: u64,
    next_line_id: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            stations: BTreeMap::new(),
            lines: BTreeMap::new(),
            next_station_id: 1,
            next_line_id: 1,
        }
    }
}

impl Network {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            stations: snapshot.stations.into_iter().map(|s| (s.id, s)).collect(),
            lines: snapshot.lines.into_iter().map(|l| (l.id, l)).collect(),
            next_station_id: snapshot.next_station_id.max(1),
            next_line_id: snapshot.next_line_id.max(1),
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            next_station_id: self.next_station_id,
            next_line_id: self.next_line_id,
            stations: self.stations.values().cloned().collect(),
            lines: self.lines.values().cloned().collect(),
        }
    }

    // --- stations ---

    pub fn create_station(&mut self, name: StationName) -> Result<Station, StoreError> {
        if self.stations.values().any(|s| s.name == name) {
            return Err(StoreError::Conflict(format!(
                "station name {name} is already in use"
            )));
        }

        let id = StationId(take_id(&mut self.next_station_id, "station")?);
        let station = Station::new(id, name);
        self.stations.insert(id, station.clone());
        Ok(station)
    }

    pub fn stations(&self) -> Vec<Station> {
        self.stations.values().cloned().collect()
    }

    pub fn station(&self, id: StationId) -> Result<&Station, StoreError> {
        self.stations
            .get(&id)
            .ok_or_else(|| StoreError::station_not_found(id.0))
    }

    /// Delete a station no line runs through.
    pub fn delete_station(&mut self, id: StationId) -> Result<(), StoreError> {
        self.station(id)?;
        if let Some(line) = self.lines.values().find(|l| l.serves(id)) {
            debug!(station = %id, line = %line.id, "station still on a line");
            return Err(ValidationError::StationInUse(id).into());
        }
        self.stations.remove(&id);
        Ok(())
    }

    // --- lines ---

    pub fn create_line(&mut self, new: NewLine) -> Result<Line, StoreError> {
        self.station(new.up_station)?;
        self.station(new.down_station)?;
        let first = Section::new(new.up_station, new.down_station, new.distance)?;
        self.ensure_line_name_free(&new.name, None)?;

        let id = LineId(take_id(&mut self.next_line_id, "line")?);
        let line = Line::new(id, new.name, new.color, first);
        self.lines.insert(id, line.clone());
        Ok(line)
    }

    pub fn lines(&self) -> Vec<Line> {
        self.lines.values().cloned().collect()
    }

    pub fn line(&self, id: LineId) -> Result<&Line, StoreError> {
        self.lines
            .get(&id)
            .ok_or_else(|| StoreError::line_not_found(id.0))
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut Line, StoreError> {
        self.lines
            .get_mut(&id)
            .ok_or_else(|| StoreError::line_not_found(id.0))
    }

    pub fn update_line(&mut self, id: LineId, update: LineUpdate) -> Result<Line, StoreError> {
        self.line(id)?;
        if let Some(name) = &update.name {
            self.ensure_line_name_free(name, Some(id))?;
        }

        let line = self.line_mut(id)?;
        if let Some(name) = update.name {
            line.name = name;
        }
        if let Some(color) = update.color {
            line.color = color;
        }
        Ok(line.clone())
    }

    pub fn delete_line(&mut self, id: LineId) -> Result<(), StoreError> {
        self.lines
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::line_not_found(id.0))
    }

    fn ensure_line_name_free(&self, name: &LineName, except: Option<LineId>) -> Result<(), StoreError> {
        let taken = self
            .lines
            .values()
            .any(|l| &l.name == name && Some(l.id) != except);
        if taken {
            return Err(StoreError::Conflict(format!(
                "line name {name} is already in use"
            )));
        }
        Ok(())
    }

    // --- sections ---

    /// Extend a line at its terminus.
    pub fn append_section(
        &mut self,
        line_id: LineId,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<Line, StoreError> {
        self.line(line_id)?;
        self.station(up)?;
        self.station(down)?;
        let section = Section::new(up, down, distance)?;

        let line = self.line_mut(line_id)?;
        line.add_section(section).inspect_err(|e| {
            debug!(line = %line_id, %up, %down, error = %e, "section rejected");
        })?;
        Ok(line.clone())
    }

    /// Remove a line's terminal station.
    pub fn remove_terminus(&mut self, line_id: LineId, station: StationId) -> Result<(), StoreError> {
        let line = self.line_mut(line_id)?;
        line.remove_station(station).inspect_err(|e| {
            debug!(line = %line_id, %station, error = %e, "terminus removal rejected");
        })?;
        Ok(())
    }

    /// The stations of a line in travel order.
    pub fn path(&self, line_id: LineId) -> Result<Vec<Station>, StoreError> {
        self.stations_on(self.line(line_id)?)
    }

    /// Resolve the station ids of `line` in travel order.
    pub fn stations_on(&self, line: &Line) -> Result<Vec<Station>, StoreError> {
        line.path()
            .station_ids()
            .into_iter()
            .map(|id| self.station(id).cloned())
            .collect()
    }

    /// Pair `line` with its resolved stations.
    pub fn view(&self, line: Line) -> Result<LineView, StoreError> {
        let stations = self.stations_on(&line)?;
        Ok(LineView { line, stations })
    }
}

/// Hand out `counter` and advance it, failing once the id space runs out.
fn take_id(counter: &mut u64, entity: &'static str) -> Result<u64, StoreError> {
    let id = *counter;
    *counter = id.checked_add(1).ok_or(StoreError::IdsExhausted(entity))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn distance(d: i64) -> Distance {
        Distance::new(d).unwrap()
    }

    fn new_line(name: &str, up: StationId, down: StationId) -> NewLine {
        NewLine {
            name: LineName::parse(name).unwrap(),
            color: LineColor::parse("bg-red-600").unwrap(),
            up_station: up,
            down_station: down,
            distance: distance(10),
        }
    }

    /// Stations Gangnam(1), Yangjae(2), Yangjae Citizen's Forest(3) and
    /// line 1 running 1 -> 2.
    fn network() -> Network {
        let mut net = Network::default();
        net.create_station(name("Gangnam")).unwrap();
        net.create_station(name("Yangjae")).unwrap();
        net.create_station(name("Yangjae Citizen's Forest")).unwrap();
        net.create_line(new_line("Sinbundang", StationId(1), StationId(2)))
            .unwrap();
        net
    }

    fn ids(stations: &[Station]) -> Vec<u64> {
        stations.iter().map(|s| s.id.0).collect()
    }

    #[test]
    fn station_ids_are_sequential() {
        let mut net = Network::default();
        assert_eq!(net.create_station(name("A")).unwrap().id, StationId(1));
        assert_eq!(net.create_station(name("B")).unwrap().id, StationId(2));
        net.delete_station(StationId(2)).unwrap();
        assert_eq!(net.create_station(name("C")).unwrap().id, StationId(3));
    }

    #[test]
    fn duplicate_station_name_conflicts() {
        let mut net = network();
        let err = net.create_station(name("Gangnam")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(net.stations().len(), 3);
    }

    #[test]
    fn station_on_a_line_cannot_be_deleted() {
        let mut net = network();
        let err = net.delete_station(StationId(1)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::StationInUse(StationId(1)))
        ));
        net.delete_station(StationId(3)).unwrap();
        assert_eq!(ids(&net.stations()), vec![1, 2]);
    }

    #[test]
    fn delete_unknown_station_is_not_found() {
        let mut net = network();
        assert!(matches!(
            net.delete_station(StationId(99)),
            Err(StoreError::NotFound { entity: "station", id: 99 })
        ));
    }

    #[test]
    fn create_line_requires_known_stations() {
        let mut net = network();
        let err = net
            .create_line(new_line("Line 2", StationId(1), StationId(99)))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "station", id: 99 }));
        assert_eq!(net.lines().len(), 1);
    }

    #[test]
    fn create_line_rejects_loop_and_duplicate_name() {
        let mut net = network();
        assert!(matches!(
            net.create_line(new_line("Line 2", StationId(1), StationId(1))),
            Err(StoreError::Validation(ValidationError::SameStation(_)))
        ));
        assert!(matches!(
            net.create_line(new_line("Sinbundang", StationId(2), StationId(3))),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn update_line_changes_only_given_fields() {
        let mut net = network();
        let update = LineUpdate {
            name: None,
            color: Some(LineColor::parse("bg-blue-600").unwrap()),
        };
        let line = net.update_line(LineId(1), update).unwrap();
        assert_eq!(line.name.as_str(), "Sinbundang");
        assert_eq!(line.color.as_str(), "bg-blue-600");
    }

    #[test]
    fn update_line_may_keep_its_own_name() {
        let mut net = network();
        let update = LineUpdate {
            name: Some(LineName::parse("Sinbundang").unwrap()),
            color: None,
        };
        assert!(net.update_line(LineId(1), update).is_ok());
    }

    #[test]
    fn update_line_rejects_name_of_another_line() {
        let mut net = network();
        net.create_line(new_line("Line 2", StationId(2), StationId(3)))
            .unwrap();
        let update = LineUpdate {
            name: Some(LineName::parse("Line 2").unwrap()),
            color: None,
        };
        assert!(matches!(
            net.update_line(LineId(1), update),
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(net.line(LineId(1)).unwrap().name.as_str(), "Sinbundang");
    }

    #[test]
    fn delete_line_frees_its_stations() {
        let mut net = network();
        net.delete_line(LineId(1)).unwrap();
        assert!(net.line(LineId(1)).is_err());
        net.delete_station(StationId(1)).unwrap();
        assert!(matches!(
            net.delete_line(LineId(1)),
            Err(StoreError::NotFound { entity: "line", .. })
        ));
    }

    #[test]
    fn append_then_path() {
        let mut net = network();
        let line = net
            .append_section(LineId(1), StationId(2), StationId(3), distance(3))
            .unwrap();
        assert_eq!(line.path().section_count(), 2);
        assert_eq!(ids(&net.path(LineId(1)).unwrap()), vec![1, 2, 3]);
    }

    #[test]
    fn append_rejects_unknown_station_and_line() {
        let mut net = network();
        assert!(matches!(
            net.append_section(LineId(1), StationId(2), StationId(42), distance(3)),
            Err(StoreError::NotFound { entity: "station", id: 42 })
        ));
        assert!(matches!(
            net.append_section(LineId(9), StationId(2), StationId(3), distance(3)),
            Err(StoreError::NotFound { entity: "line", id: 9 })
        ));
    }

    #[test]
    fn append_rejects_non_contiguous_section() {
        let mut net = network();
        assert!(matches!(
            net.append_section(LineId(1), StationId(1), StationId(3), distance(3)),
            Err(StoreError::Validation(ValidationError::NotContiguous))
        ));
        assert_eq!(ids(&net.path(LineId(1)).unwrap()), vec![1, 2]);
    }

    #[test]
    fn remove_terminus_rules() {
        let mut net = network();
        assert!(matches!(
            net.remove_terminus(LineId(1), StationId(2)),
            Err(StoreError::Validation(ValidationError::SingleSection))
        ));

        net.append_section(LineId(1), StationId(2), StationId(3), distance(3))
            .unwrap();
        assert!(matches!(
            net.remove_terminus(LineId(1), StationId(2)),
            Err(StoreError::Validation(ValidationError::NotTerminus))
        ));
        net.remove_terminus(LineId(1), StationId(3)).unwrap();
        assert_eq!(ids(&net.path(LineId(1)).unwrap()), vec![1, 2]);
    }

    #[test]
    fn exhausted_ids_fail_without_change() {
        let mut snapshot = network().to_snapshot();
        snapshot.next_station_id = u64::MAX;
        snapshot.next_line_id = u64::MAX;
        let mut net = Network::from_snapshot(snapshot);

        assert!(matches!(
            net.create_station(name("Jeonggeomdal")),
            Err(StoreError::IdsExhausted("station"))
        ));
        assert_eq!(net.stations().len(), 3);
        assert_eq!(net.to_snapshot().next_station_id, u64::MAX);

        assert!(matches!(
            net.create_line(new_line("Line 2", StationId(2), StationId(3))),
            Err(StoreError::IdsExhausted("line"))
        ));
        assert_eq!(net.lines().len(), 1);
    }

    #[test]
    fn snapshot_roundtrip_keeps_counters() {
        let net = network();
        let mut restored = Network::from_snapshot(net.to_snapshot());
        assert_eq!(restored.lines(), net.lines());
        assert_eq!(
            restored.create_station(name("Gangnam-gu Office")).unwrap().id,
            StationId(4)
        );
    }
}
