use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::tempdir;

use starlog_core::storage::models::{FileType, SizeLabel};
use starlog_core::{AppConfig, Dataset, Error, PipelineEngine};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Lay out a realistic input tree:
///   users/    two dated snapshot exports (second adds one uuid)
///   dumped/   raw session/entry/file logs for 2023-06-14
///   processed/  empty, populated by the run
fn create_fixture(root: &Path) -> AppConfig {
    let users_dir = root.join("users");
    let dumped_dir = root.join("dumped");
    let processed_dir = root.join("processed");
    fs::create_dir_all(&users_dir).unwrap();
    fs::create_dir_all(&dumped_dir).unwrap();
    fs::create_dir_all(&processed_dir).unwrap();

    fs::write(
        users_dir.join("users_2023_06_01.csv"),
        "uuid,countryCode\nu1,TW\nu2,DE\n",
    )
    .unwrap();
    fs::write(
        users_dir.join("users_2023_06_02.csv"),
        "uuid,countryCode\nu1,TW\nu2,DE\nu3,\n",
    )
    .unwrap();

    // 1686729600000 ms = 2023-06-14 08:00:00 UTC (a Wednesday).
    fs::write(
        dumped_dir.join("sessions.csv"),
        "id,startTime,backendPlatform,backendPlatformInfo.version,backendPlatformInfo.distro,backendPlatformInfo.variant\n\
         s1,1686729600000,Linux,5.15.0-86-generic,Debian GNU/Linux 11,\n\
         s2,1686733200000,macOS,13.4.1,,\n",
    )
    .unwrap();

    fs::write(
        dumped_dir.join("entries.csv"),
        "sessionId,ipHash,action,timestamp,countryCode\n\
         s1,aaa,optIn,1686729600000,TW\n\
         s1,aaa,fileOpen,1686729660000,TW\n\
         s1,bbb,optOut,1686729700000,TW\n",
    )
    .unwrap();

    fs::write(
        dumped_dir.join("file_details.csv"),
        "sessionId,timestamp,details.width,details.height,details.depth,details.stokes\n\
         s1,1686729600000,100,100,1,1\n\
         s1,1686729700000,512,512,100,\n",
    )
    .unwrap();

    AppConfig {
        users_csv_dir: users_dir.to_string_lossy().into_owned(),
        dumped_file_dir: dumped_dir.to_string_lossy().into_owned(),
        processed_file_dir: processed_dir.to_string_lossy().into_owned(),
    }
}

fn engine_for(config: &AppConfig) -> PipelineEngine {
    // Fixed window so the test does not depend on the wall clock.
    PipelineEngine::new(config.clone())
        .with_window_start(date("2023-06-01"))
        .with_window_end(date("2023-07-01"))
}

#[test]
fn test_full_pipeline() {
    let tmp = tempdir().unwrap();
    let config = create_fixture(tmp.path());

    let result = engine_for(&config).run().unwrap();

    assert_eq!(result.snapshots_merged, 2);
    assert_eq!(result.users_total, 3);
    assert_eq!(result.sessions, 2);
    assert_eq!(result.entries, 3);
    assert_eq!(result.files, 2);

    let dataset = Dataset::load(Path::new(&config.processed_file_dir)).unwrap();

    // Registry: u3 first appeared in the second snapshot.
    assert_eq!(dataset.users.len(), 3);
    let u3 = dataset.users.iter().find(|u| u.uuid == "u3").unwrap();
    assert_eq!(u3.datetime, date("2023-06-02"));
    assert_eq!(u3.country, None);
    let u1 = dataset.users.iter().find(|u| u.uuid == "u1").unwrap();
    assert_eq!(u1.country.as_deref(), Some("Taiwan"));

    // Sessions: derived OS columns plus country joined from first entry.
    let s1 = dataset.sessions.iter().find(|s| s.id == "s1").unwrap();
    assert_eq!(s1.os, "Debian GNU");
    assert_eq!(s1.os_version.as_deref(), Some("5.15.0-86-generic"));
    assert_eq!(s1.country_code.as_deref(), Some("TW"));
    assert_eq!(s1.country.as_deref(), Some("Taiwan"));

    let s2 = dataset.sessions.iter().find(|s| s.id == "s2").unwrap();
    assert_eq!(s2.os, "macOS");
    assert_eq!(s2.os_version.as_deref(), Some("13"));
    // No entries for s2: country stays absent, not an error.
    assert_eq!(s2.country_code, None);
    assert_eq!(s2.country, None);

    // Files: 100×100 scalar → 2D, <1MB; 512×512×100 (stokes absent → 1)
    // → 3D, exactly 100 MB which lands right-closed in 10MB-100MB.
    assert_eq!(dataset.files[0].file_type, Some(FileType::TwoDim));
    assert_eq!(dataset.files[0].size_label, Some(SizeLabel::Below1Mb));
    assert_eq!(dataset.files[1].file_type, Some(FileType::ThreeDim));
    assert_eq!(dataset.files[1].size_label, Some(SizeLabel::Mb10To100));

    // 2023-06-14 had 2 unique visitors, below the 2023 workday threshold
    // of 60; every other date in the window has no data and is skipped.
    assert_eq!(dataset.missing_dates.len(), 1);
    assert_eq!(dataset.missing_dates[0].datetime, date("2023-06-14"));

    // Consent statistics: one optIn, one optOut.
    assert_eq!(dataset.opt_in_fraction(), Some(0.5));
}

#[test]
fn test_rerun_is_idempotent() {
    let tmp = tempdir().unwrap();
    let config = create_fixture(tmp.path());

    let first = engine_for(&config).run().unwrap();
    assert_eq!(first.users_added, 3);

    // Same snapshots again: all skipped, registry unchanged.
    let second = engine_for(&config).run().unwrap();
    assert_eq!(second.snapshots_merged, 0);
    assert_eq!(second.users_added, 0);
    assert_eq!(second.users_total, first.users_total);

    let dataset = Dataset::load(Path::new(&config.processed_file_dir)).unwrap();
    assert_eq!(dataset.users.len(), 3);
}

#[test]
fn test_new_snapshot_extends_registry() {
    let tmp = tempdir().unwrap();
    let config = create_fixture(tmp.path());

    engine_for(&config).run().unwrap();

    fs::write(
        Path::new(&config.users_csv_dir).join("users_2023_06_10.csv"),
        "uuid,countryCode\nu1,TW\nu4,JP\n",
    )
    .unwrap();

    let result = engine_for(&config).run().unwrap();
    assert_eq!(result.snapshots_merged, 1);
    assert_eq!(result.users_added, 1);
    assert_eq!(result.users_total, 4);

    let dataset = Dataset::load(Path::new(&config.processed_file_dir)).unwrap();
    let u4 = dataset.users.iter().find(|u| u.uuid == "u4").unwrap();
    assert_eq!(u4.datetime, date("2023-06-10"));
    assert_eq!(u4.country.as_deref(), Some("Japan"));
}

#[test]
fn test_malformed_snapshot_aborts_and_preserves_registry() {
    let tmp = tempdir().unwrap();
    let config = create_fixture(tmp.path());

    engine_for(&config).run().unwrap();
    let registry_path = config.registry_path();
    let before = fs::read_to_string(&registry_path).unwrap();

    // No YYYY_MM_DD token in the name: the run must fail before touching
    // the registry.
    fs::write(
        Path::new(&config.users_csv_dir).join("users_latest.csv"),
        "uuid,countryCode\nu9,FR\n",
    )
    .unwrap();

    let err = engine_for(&config).run().unwrap_err();
    assert!(matches!(err, Error::MalformedSnapshot { .. }), "got {:?}", err);
    assert_eq!(fs::read_to_string(&registry_path).unwrap(), before);
}

#[test]
fn test_snapshot_without_uuid_column_is_malformed() {
    let tmp = tempdir().unwrap();
    let config = create_fixture(tmp.path());

    let bad: PathBuf = Path::new(&config.users_csv_dir).join("users_2023_06_03.csv");
    fs::write(&bad, "id,countryCode\nx,FR\n").unwrap();

    let err = engine_for(&config).run().unwrap_err();
    match err {
        Error::MalformedSnapshot { reason, .. } => {
            assert!(reason.contains("uuid"), "reason: {}", reason)
        }
        other => panic!("expected MalformedSnapshot, got {:?}", other),
    }
}
