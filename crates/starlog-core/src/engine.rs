use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::assemble;
use crate::config::AppConfig;
use crate::detect::{self, ThresholdTable};
use crate::error::Error;
use crate::registry;
use crate::storage;
use crate::storage::models::{MissingDataDate, RawEntry, RawFile, RawSession};

pub struct PipelineEngine {
    config: AppConfig,
    thresholds: ThresholdTable,
    window_start: NaiveDate,
    window_end: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub merge_duration: Duration,
    pub derive_duration: Duration,
    pub detect_duration: Duration,
    pub write_duration: Duration,
    pub snapshots_merged: usize,
    pub users_added: usize,
    pub users_total: usize,
    pub sessions: usize,
    pub entries: usize,
    pub files: usize,
    pub missing_dates: usize,
}

impl PipelineEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            thresholds: ThresholdTable::builtin(),
            window_start: detect::DEFAULT_WINDOW_START,
            window_end: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Detection window start; defaults to the start of telemetry history.
    pub fn with_window_start(mut self, start: NaiveDate) -> Self {
        self.window_start = start;
        self
    }

    /// Detection window end (exclusive); defaults to today.
    pub fn with_window_end(mut self, end: NaiveDate) -> Self {
        self.window_end = Some(end);
        self
    }

    /// Run the full batch pipeline:
    /// 1. Merge new registry snapshots (strictly sequential by date)
    /// 2. Load raw session/entry/file logs
    /// 3. Derive categorical columns (row-parallel)
    /// 4. Detect missing-data dates from daily unique visitors
    /// 5. Atomically persist the five output tables
    pub fn run(&self) -> Result<PipelineResult, Error> {
        // Phase 1: Merge
        info!("Merging registry snapshots...");
        let merge_start = Instant::now();
        let registry_path = self.config.registry_path();
        let outcome = registry::merge_snapshot_dir(
            &registry_path,
            std::path::Path::new(&self.config.users_csv_dir),
        )?;
        let registry = registry::UserRegistry::load(&registry_path)?;
        let merge_duration = merge_start.elapsed();

        // Phase 2 + 3: Load and derive
        info!("Deriving categorical columns...");
        let derive_start = Instant::now();
        let raw_sessions: Vec<RawSession> =
            storage::read_rows(&self.config.raw_path("sessions.csv"))?;
        let raw_entries: Vec<RawEntry> =
            storage::read_rows(&self.config.raw_path("entries.csv"))?;
        let raw_files: Vec<RawFile> =
            storage::read_rows(&self.config.raw_path("file_details.csv"))?;

        let users = assemble::enrich_users(registry.records());
        let entries = assemble::enrich_entries(&raw_entries)?;
        let sessions = assemble::enrich_sessions(&raw_sessions, &entries)?;
        let files = assemble::enrich_files(&raw_files)?;
        let derive_duration = derive_start.elapsed();
        debug!(
            "Derivation completed in {:.2}s — {} users, {} sessions, {} entries, {} files",
            derive_duration.as_secs_f64(),
            users.len(),
            sessions.len(),
            entries.len(),
            files.len(),
        );

        // Phase 4: Detect
        info!("Detecting missing-data dates...");
        let detect_start = Instant::now();
        let window_end = self
            .window_end
            .unwrap_or_else(|| Local::now().date_naive());
        let daily_counts = detect::daily_unique_visitors(&entries);
        let flagged = detect::detect(
            &daily_counts,
            self.window_start,
            window_end,
            &self.thresholds,
            &detect::YEAR_END_HOLIDAYS,
        )?;
        let missing: Vec<MissingDataDate> = flagged
            .into_iter()
            .map(|datetime| MissingDataDate { datetime })
            .collect();
        let detect_duration = detect_start.elapsed();
        debug!(
            "Detection completed in {:.2}s — {} flagged dates over [{}, {})",
            detect_duration.as_secs_f64(),
            missing.len(),
            self.window_start,
            window_end,
        );

        // Phase 5: Persist
        info!("Writing processed tables...");
        let write_start = Instant::now();
        storage::write_rows_atomic(&self.config.output_path("processed_users.csv"), &users)?;
        storage::write_rows_atomic(&self.config.output_path("processed_sessions.csv"), &sessions)?;
        storage::write_rows_atomic(&self.config.output_path("processed_entries.csv"), &entries)?;
        storage::write_rows_atomic(&self.config.output_path("processed_files.csv"), &files)?;
        storage::write_rows_atomic(&self.config.output_path("missing_data_dates.csv"), &missing)?;
        let write_duration = write_start.elapsed();

        Ok(PipelineResult {
            merge_duration,
            derive_duration,
            detect_duration,
            write_duration,
            snapshots_merged: outcome.snapshots_merged,
            users_added: outcome.users_added,
            users_total: registry.len(),
            sessions: sessions.len(),
            entries: entries.len(),
            files: files.len(),
            missing_dates: missing.len(),
        })
    }
}
