//! In-memory roster cache refreshed from the Workday roster export.
//!
//! Readers clone an `Arc` of the current map under a read lock, so a refresh
//! swaps in a fully built map and no lookup ever sees a partial roster. The
//! map can be persisted to a JSON snapshot so a restarted station can serve
//! lookups before its first successful refresh.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{RosterExport, RosterSource};
use crate::error::{DataSource, EngineError, EngineResult};
use crate::models::RosterRecord;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    refreshed_at: DateTime<Utc>,
    records: Vec<RosterRecord>,
}

/// Roster records keyed by external id.
#[derive(Debug, Default)]
pub struct RosterCache {
    records: RwLock<Arc<HashMap<String, RosterRecord>>>,
    refreshed_at: RwLock<Option<DateTime<Utc>>>,
    snapshot_path: Option<PathBuf>,
}

impl RosterCache {
    /// Creates an empty cache, persisted to `snapshot_path` when given.
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            snapshot_path,
            ..Self::default()
        }
    }

    /// Number of cached records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// When the cached roster was last replaced.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self.refreshed_at.read().await
    }

    /// Swaps in a new roster. Records without an external id are skipped;
    /// a repeated id keeps its last record.
    pub async fn replace(&self, records: Vec<RosterRecord>, refreshed_at: DateTime<Utc>) -> usize {
        let map: HashMap<String, RosterRecord> = records
            .into_iter()
            .filter(|record| !record.external_id.trim().is_empty())
            .map(|record| (record.external_id.clone(), record))
            .collect();
        let count = map.len();
        *self.records.write().await = Arc::new(map);
        *self.refreshed_at.write().await = Some(refreshed_at);
        count
    }

    /// Loads the on-disk snapshot, if one is configured and present.
    ///
    /// Returns the number of records loaded; a missing file loads nothing.
    pub async fn load_snapshot(&self) -> EngineResult<usize> {
        let Some(path) = &self.snapshot_path else {
            return Ok(0);
        };
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no roster snapshot on disk");
                return Ok(0);
            }
            Err(err) => return Err(EngineError::unavailable(DataSource::Roster, err)),
        };
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|err| EngineError::malformed("roster snapshot", err))?;
        let count = self.replace(snapshot.records, snapshot.refreshed_at).await;
        info!(path = %path.display(), records = count, refreshed_at = %snapshot.refreshed_at, "loaded roster snapshot");
        Ok(count)
    }

    /// Downloads the roster export and swaps it in.
    ///
    /// An empty export is treated as a failure and leaves the current roster
    /// in place. Failing to write the snapshot is logged, not returned.
    pub async fn refresh(&self, export: &dyn RosterExport) -> EngineResult<usize> {
        let records = export.fetch_roster().await?;
        if records.is_empty() {
            return Err(EngineError::unavailable(
                DataSource::RosterExport,
                "export returned no workers",
            ));
        }
        let refreshed_at = Utc::now();
        if let Some(path) = &self.snapshot_path {
            if let Err(err) = write_snapshot(path, &records, refreshed_at).await {
                warn!(path = %path.display(), error = %err, "could not write roster snapshot");
            }
        }
        Ok(self.replace(records, refreshed_at).await)
    }
}

#[async_trait]
impl RosterSource for RosterCache {
    async fn lookup(&self, external_id: &str) -> EngineResult<RosterRecord> {
        let records = Arc::clone(&*self.records.read().await);
        records
            .get(external_id.trim())
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                entity: "employee".to_string(),
                id: external_id.to_string(),
            })
    }
}

async fn write_snapshot(path: &Path, records: &[RosterRecord], refreshed_at: DateTime<Utc>) -> EngineResult<()> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        refreshed_at: DateTime<Utc>,
        records: &'a [RosterRecord],
    }

    let json = serde_json::to_vec(&SnapshotRef { refreshed_at, records })
        .map_err(|err| EngineError::malformed("roster snapshot", err))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| EngineError::unavailable(DataSource::Roster, err))?;
    }
    let temp = path.with_extension("json.tmp");
    tokio::fs::write(&temp, json)
        .await
        .map_err(|err| EngineError::unavailable(DataSource::Roster, err))?;
    tokio::fs::rename(&temp, path)
        .await
        .map_err(|err| EngineError::unavailable(DataSource::Roster, err))?;
    Ok(())
}

/// Refreshes `cache` every `interval`, retrying after `retry` on failure.
///
/// The first refresh runs immediately. Notifying `trigger` starts a refresh
/// without waiting for the timer.
pub fn spawn_refresh_loop(
    cache: Arc<RosterCache>,
    export: Arc<dyn RosterExport>,
    interval: Duration,
    retry: Duration,
    trigger: Arc<Notify>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let started = std::time::Instant::now();
            let wait = match cache.refresh(export.as_ref()).await {
                Ok(count) => {
                    info!(records = count, took_ms = started.elapsed().as_millis() as u64, "roster cache refreshed");
                    interval
                }
                Err(err) => {
                    error!(error = %err, retry_secs = retry.as_secs(), "roster cache refresh failed");
                    retry
                }
            };
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = trigger.notified() => debug!("roster cache refresh requested"),
            }
        }
    })
}
