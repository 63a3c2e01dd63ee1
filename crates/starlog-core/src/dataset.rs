//! Read-only access to the five processed tables, for consumers that serve
//! them (the presentation layer). Loaded once, with an explicit `reload`
//! so a long-running consumer can pick up a freshly-written pipeline run
//! without restarting.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Error;
use crate::storage;
use crate::storage::models::{
    Action, MissingDataDate, ProcessedEntry, ProcessedFile, ProcessedSession, ProcessedUser,
};

#[derive(Debug)]
pub struct Dataset {
    dir: PathBuf,
    pub users: Vec<ProcessedUser>,
    pub sessions: Vec<ProcessedSession>,
    pub entries: Vec<ProcessedEntry>,
    pub files: Vec<ProcessedFile>,
    pub missing_dates: Vec<MissingDataDate>,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let mut dataset = Self {
            dir: dir.to_path_buf(),
            users: Vec::new(),
            sessions: Vec::new(),
            entries: Vec::new(),
            files: Vec::new(),
            missing_dates: Vec::new(),
        };
        dataset.reload()?;
        Ok(dataset)
    }

    /// Re-read all five tables from disk. The pipeline replaces each file
    /// atomically, so a reload mid-run sees either the old or the new
    /// table, never a partial one.
    pub fn reload(&mut self) -> Result<(), Error> {
        self.users = storage::read_rows(&self.dir.join("processed_users.csv"))?;
        self.sessions = storage::read_rows(&self.dir.join("processed_sessions.csv"))?;
        self.entries = storage::read_rows(&self.dir.join("processed_entries.csv"))?;
        self.files = storage::read_rows(&self.dir.join("processed_files.csv"))?;
        self.missing_dates = storage::read_rows(&self.dir.join("missing_data_dates.csv"))?;
        info!(
            "Loaded dataset from {}: {} users, {} sessions, {} entries, {} files, {} missing dates",
            self.dir.display(),
            self.users.len(),
            self.sessions.len(),
            self.entries.len(),
            self.files.len(),
            self.missing_dates.len(),
        );
        Ok(())
    }

    /// Fraction of telemetry consent decisions that were opt-ins:
    /// optIn / (optIn + optOut). `None` when no decision was ever logged.
    pub fn opt_in_fraction(&self) -> Option<f64> {
        let mut opt_in = 0u64;
        let mut opt_out = 0u64;
        for entry in &self.entries {
            match entry.action {
                Action::OptIn => opt_in += 1,
                Action::OptOut => opt_out += 1,
                _ => {}
            }
        }
        if opt_in + opt_out == 0 {
            return None;
        }
        Some(opt_in as f64 / (opt_in + opt_out) as f64)
    }
}
