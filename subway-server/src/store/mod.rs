//! Shared, optionally persistent store for the subway network.
//!
//! All mutations go through one write lock that spans validation, the
//! change itself and the snapshot write. Concurrent requests against the
//! same line are therefore serialised, and readers never see a half-applied
//! change.

mod error;
mod network;
mod snapshot;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Distance, LineId, Station, StationId, StationName};

pub use error::StoreError;
pub use network::{LineUpdate, LineView, Network, NewLine};
pub use snapshot::{Snapshot, SnapshotFile};

/// Thread-safe handle to the network.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Network>>,
    snapshot: Option<SnapshotFile>,
}

impl Store {
    /// An empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Network::default())),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file.
    ///
    /// A missing file starts an empty network; it is created on the first
    /// mutation.
    pub fn open(file: SnapshotFile) -> Result<Self, StoreError> {
        let network = match file.load()? {
            Some(snapshot) => {
                info!(
                    path = %file.path().display(),
                    stations = snapshot.stations.len(),
                    lines = snapshot.lines.len(),
                    "loaded snapshot"
                );
                Network::from_snapshot(snapshot)
            }
            None => Network::default(),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(network)),
            snapshot: Some(file),
        })
    }

    /// Apply `op` to a copy of the network, persist it, then publish it.
    ///
    /// If either step fails the visible network is untouched.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Network) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let out = op(&mut next)?;
        if let Some(file) = &self.snapshot {
            file.save(&next.to_snapshot())?;
        }
        *guard = next;
        Ok(out)
    }

    pub async fn create_station(&self, name: StationName) -> Result<Station, StoreError> {
        let station = self.mutate(|net| net.create_station(name)).await?;
        info!(id = %station.id, name = %station.name, "created station");
        Ok(station)
    }

    pub async fn list_stations(&self) -> Vec<Station> {
        self.inner.read().await.stations()
    }

    pub async fn station(&self, id: StationId) -> Result<Station, StoreError> {
        self.inner.read().await.station(id).cloned()
    }

    pub async fn delete_station(&self, id: StationId) -> Result<(), StoreError> {
        self.mutate(|net| net.delete_station(id)).await?;
        info!(%id, "deleted station");
        Ok(())
    }

    pub async fn create_line(&self, new: NewLine) -> Result<LineView, StoreError> {
        let view = self
            .mutate(|net| {
                let line = net.create_line(new)?;
                net.view(line)
            })
            .await?;
        info!(id = %view.line.id, name = %view.line.name, "created line");
        Ok(view)
    }

    pub async fn list_lines(&self) -> Result<Vec<LineView>, StoreError> {
        let net = self.inner.read().await;
        net.lines().into_iter().map(|line| net.view(line)).collect()
    }

    pub async fn line(&self, id: LineId) -> Result<LineView, StoreError> {
        let net = self.inner.read().await;
        net.view(net.line(id)?.clone())
    }

    pub async fn update_line(&self, id: LineId, update: LineUpdate) -> Result<LineView, StoreError> {
        let view = self
            .mutate(|net| {
                let line = net.update_line(id, update)?;
                net.view(line)
            })
            .await?;
        info!(%id, "updated line");
        Ok(view)
    }

    pub async fn delete_line(&self, id: LineId) -> Result<(), StoreError> {
        self.mutate(|net| net.delete_line(id)).await?;
        info!(%id, "deleted line");
        Ok(())
    }

    /// Extend a line at its terminus and return the updated line.
    pub async fn append_section(
        &self,
        line: LineId,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<LineView, StoreError> {
        let updated = self
            .mutate(|net| {
                let extended = net.append_section(line, up, down, distance)?;
                net.view(extended)
            })
            .await?;
        info!(%line, %up, %down, "appended section");
        Ok(updated)
    }

    /// Remove a line's terminal station.
    pub async fn remove_terminus(&self, line: LineId, station: StationId) -> Result<(), StoreError> {
        self.mutate(|net| net.remove_terminus(line, station)).await?;
        info!(%line, %station, "removed terminus");
        Ok(())
    }

    /// Stations of a line in travel order.
    pub async fn path(&self, line: LineId) -> Result<Vec<Station>, StoreError> {
        self.inner.read().await.path(line)
    }
}
