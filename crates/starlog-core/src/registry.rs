//! Cumulative user registry: folds dated snapshot exports into one
//! append-only, uuid-deduplicated table with a first-seen date per user.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::calendar;
use crate::error::Error;
use crate::storage;
use crate::storage::models::{SnapshotRow, UserRecord};

#[derive(Debug, Default)]
pub struct UserRegistry {
    records: Vec<UserRecord>,
    uuids: HashSet<String>,
    last_snapshot_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOutcome {
    pub snapshots_seen: usize,
    pub snapshots_merged: usize,
    pub users_added: usize,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry file; a missing file yields an empty registry
    /// (the first snapshot will seed it).
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            debug!("No registry at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let records: Vec<UserRecord> = storage::read_rows(path)?;
        let uuids = records.iter().map(|r| r.uuid.clone()).collect();
        // Records are appended in snapshot order, so the last row carries
        // the most recent snapshot date.
        let last_snapshot_date = records.last().map(|r| r.registration_date);
        Ok(Self {
            records,
            uuids,
            last_snapshot_date,
        })
    }

    /// Atomically rewrite the registry file.
    pub fn store(&self, path: &Path) -> Result<(), Error> {
        storage::write_rows_atomic(path, &self.records)
    }

    /// Merge one snapshot captured on `snapshot_date`. Every uuid not yet
    /// in the registry is appended with that date as its registration date.
    /// A snapshot dated at or before the last merged snapshot is skipped,
    /// so reprocessing the same files is a no-op. Returns the number of
    /// users added, or `None` for a skipped snapshot.
    pub fn merge(&mut self, snapshot: &[SnapshotRow], snapshot_date: NaiveDate) -> Option<usize> {
        if let Some(last) = self.last_snapshot_date {
            if snapshot_date <= last {
                debug!(
                    "Skipping snapshot dated {} (registry already at {})",
                    snapshot_date, last
                );
                return None;
            }
        }

        let mut added = 0;
        for row in snapshot {
            if self.uuids.contains(&row.uuid) {
                continue;
            }
            self.uuids.insert(row.uuid.clone());
            self.records.push(UserRecord {
                uuid: row.uuid.clone(),
                country_code: row.country_code.clone(),
                registration_date: snapshot_date,
            });
            added += 1;
        }

        self.last_snapshot_date = Some(snapshot_date);
        Some(added)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn last_snapshot_date(&self) -> Option<NaiveDate> {
        self.last_snapshot_date
    }
}

/// Read one snapshot file, validating its shape at the ingestion boundary:
/// the capture date must be embedded in the file name and a `uuid` column
/// must be present.
pub fn read_snapshot(path: &Path) -> Result<(Vec<SnapshotRow>, NaiveDate), Error> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let date = calendar::snapshot_date_from_name(&name).ok_or_else(|| {
        Error::MalformedSnapshot {
            path: path.display().to_string(),
            reason: "no YYYY_MM_DD date in file name".to_string(),
        }
    })?;

    let mut reader = csv::Reader::from_path(path)?;
    let has_uuid = reader.headers()?.iter().any(|h| h == "uuid");
    if !has_uuid {
        return Err(Error::MalformedSnapshot {
            path: path.display().to_string(),
            reason: "missing uuid column".to_string(),
        });
    }

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok((rows, date))
}

/// All `*.csv` files in the snapshot directory, sorted by file name. The
/// embedded dates sort with the names, which gives the non-decreasing
/// processing order the merge requires.
pub fn list_snapshots(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Merge every snapshot in `snapshot_dir` into the registry at
/// `registry_path`, rewriting it atomically at the end. A malformed
/// snapshot aborts before anything is written, leaving the previous
/// registry untouched.
pub fn merge_snapshot_dir(registry_path: &Path, snapshot_dir: &Path) -> Result<MergeOutcome, Error> {
    let mut registry = UserRegistry::load(registry_path)?;
    let before = registry.len();

    let mut outcome = MergeOutcome::default();
    for path in list_snapshots(snapshot_dir)? {
        outcome.snapshots_seen += 1;
        let (rows, date) = read_snapshot(&path)?;
        match registry.merge(&rows, date) {
            Some(added) => {
                outcome.snapshots_merged += 1;
                outcome.users_added += added;
                debug!("Merged {} (+{} users)", path.display(), added);
            }
            None => debug!("Skipped {}", path.display()),
        }
    }

    if outcome.snapshots_seen == 0 {
        warn!("No snapshot files found in {}", snapshot_dir.display());
    }

    registry.store(registry_path)?;
    info!(
        "Registry: {} users ({} new from {} of {} snapshots)",
        before + outcome.users_added,
        outcome.users_added,
        outcome.snapshots_merged,
        outcome.snapshots_seen,
    );
    Ok(outcome)
}
