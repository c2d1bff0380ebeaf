//! Disk snapshot of the whole network.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Station};

use super::error::StoreError;

/// Everything needed to rebuild the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Next id handed to a created station.
    pub next_station_id: u64,
    /// Next id handed to a created line.
    pub next_line_id: u64,
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
}

impl Snapshot {
    /// Check the cross-entity rules serde cannot see.
    ///
    /// Line paths are already re-validated during deserialization.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for station in &self.stations {
            if station.id.0 >= self.next_station_id {
                return Err(corrupt(format!("station id {} not below next id", station.id)));
            }
            if !ids.insert(station.id) {
                return Err(corrupt(format!("duplicate station id {}", station.id)));
            }
            if !names.insert(station.name.as_str()) {
                return Err(corrupt(format!("duplicate station name {}", station.name)));
            }
        }

        let mut line_ids = HashSet::new();
        let mut line_names = HashSet::new();
        for line in &self.lines {
            if line.id.0 >= self.next_line_id {
                return Err(corrupt(format!("line id {} not below next id", line.id)));
            }
            if !line_ids.insert(line.id) {
                return Err(corrupt(format!("duplicate line id {}", line.id)));
            }
            if !line_names.insert(line.name.as_str()) {
                return Err(corrupt(format!("duplicate line name {}", line.name)));
            }
            if let Some(missing) = line
                .path()
                .station_ids()
                .into_iter()
                .find(|s| !ids.contains(s))
            {
                return Err(corrupt(format!(
                    "line {} references unknown station {}",
                    line.id, missing
                )));
            }
        }

        Ok(())
    }
}

fn corrupt(message: String) -> StoreError {
    StoreError::Persistence(format!("corrupt snapshot: {message}"))
}

/// JSON file holding a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the snapshot.
    ///
    /// Returns `None` if the file does not exist yet. An unreadable or
    /// inconsistent file is an error rather than an empty network.
    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Persistence(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_str(&contents).map_err(|e| {
            StoreError::Persistence(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        snapshot.validate()?;

        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating parent directories if needed.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                StoreError::Persistence(format!("failed to create snapshot directory: {}", e))
            })?;
        }

        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| {
            StoreError::Persistence(format!("failed to serialize snapshot: {}", e))
        })?;

        // Readers see either the old file or the new one, never a torn write.
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            StoreError::Persistence(format!("failed to create temporary snapshot: {}", e))
        })?;
        tmp.write_all(&json)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| {
                StoreError::Persistence(format!("failed to write snapshot file: {}", e))
            })?;
        tmp.persist(&self.path).map_err(|e| {
            StoreError::Persistence(format!("failed to replace snapshot file: {}", e.error))
        })?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
