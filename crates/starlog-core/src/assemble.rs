//! Table assembly: join derived columns back onto the raw event tables.
//! Every enrichment is 1:1 — no row of a raw table is dropped or
//! duplicated on the way to its processed counterpart.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::calendar;
use crate::derive::{file_class, os};
use crate::error::Error;
use crate::geo;
use crate::storage::models::{
    ProcessedEntry, ProcessedFile, ProcessedSession, ProcessedUser, RawEntry, RawFile,
    RawSession, UserRecord,
};

/// Annotate registry records with country display names.
pub fn enrich_users(records: &[UserRecord]) -> Vec<ProcessedUser> {
    records
        .par_iter()
        .map(|r| ProcessedUser {
            uuid: r.uuid.clone(),
            country_code: r.country_code.clone(),
            datetime: r.registration_date,
            country: geo::annotate(r.country_code.as_deref()),
        })
        .collect()
}

pub fn enrich_entries(raw: &[RawEntry]) -> Result<Vec<ProcessedEntry>, Error> {
    raw.par_iter()
        .map(|e| {
            let datetime = calendar::datetime_from_epoch_ms(e.timestamp).ok_or_else(|| {
                Error::Other(format!(
                    "entry for session {} has invalid timestamp {}",
                    e.session_id, e.timestamp
                ))
            })?;
            Ok(ProcessedEntry {
                session_id: e.session_id.clone(),
                ip_hash: e.ip_hash.clone(),
                action: e.action.clone(),
                datetime,
                country_code: e.country_code.clone(),
            })
        })
        .collect()
}

/// Derive OS columns and join each session's country from its entries.
/// The join takes the first entry per session in original log order —
/// a stable tie-break, deliberately not latest or most-frequent. Sessions
/// with no matching entry keep absent country fields; absence is expected.
pub fn enrich_sessions(
    raw: &[RawSession],
    entries: &[ProcessedEntry],
) -> Result<Vec<ProcessedSession>, Error> {
    let mut first_entry_country: HashMap<&str, Option<&str>> = HashMap::new();
    for entry in entries {
        first_entry_country
            .entry(entry.session_id.as_str())
            .or_insert(entry.country_code.as_deref());
    }

    raw.par_iter()
        .map(|s| {
            let datetime = calendar::datetime_from_epoch_ms(s.start_time_ms).ok_or_else(|| {
                Error::Other(format!(
                    "session {} has invalid startTime {}",
                    s.id, s.start_time_ms
                ))
            })?;

            let os_info = os::derive_os(
                &s.backend_platform,
                s.platform_version.as_deref(),
                s.platform_distro.as_deref(),
            );

            let country_code = first_entry_country
                .get(s.id.as_str())
                .copied()
                .flatten()
                .map(str::to_string);
            let country = geo::annotate(country_code.as_deref());

            Ok(ProcessedSession {
                id: s.id.clone(),
                backend_platform: s.backend_platform.clone(),
                datetime,
                os: os_info.family,
                os_version: os_info.version,
                country_code,
                country,
            })
        })
        .collect()
}

pub fn enrich_files(raw: &[RawFile]) -> Result<Vec<ProcessedFile>, Error> {
    raw.par_iter()
        .map(|f| {
            let datetime = calendar::datetime_from_epoch_ms(f.timestamp).ok_or_else(|| {
                Error::Other(format!(
                    "file event for session {} has invalid timestamp {}",
                    f.session_id, f.timestamp
                ))
            })?;

            // Absent dimensions count as 1 (scalar axis).
            let width = f.width.unwrap_or(1);
            let height = f.height.unwrap_or(1);
            let depth = f.depth.unwrap_or(1);
            let stokes = f.stokes.unwrap_or(1);

            let file_size_mb = file_class::file_size_mb(width, height, depth, stokes);

            Ok(ProcessedFile {
                session_id: f.session_id.clone(),
                datetime,
                width,
                height,
                depth,
                stokes,
                file_type: file_class::classify(width, height, depth, stokes),
                file_size_mb,
                size_label: file_class::size_bucket(file_size_mb),
            })
        })
        .collect()
}
