//! Typed row definitions for every raw and processed table. Raw structs
//! mirror the CSV headers the collection mechanism deposits (including the
//! dotted `details.*` columns); processed structs mirror the five output
//! tables the presentation layer reads.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Backend host platform reported by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackendPlatform {
    Linux,
    MacOs,
    Windows,
    Other(String),
}

impl From<String> for BackendPlatform {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Linux" => Self::Linux,
            "macOS" => Self::MacOs,
            "Windows" => Self::Windows,
            _ => Self::Other(s),
        }
    }
}

impl From<BackendPlatform> for String {
    fn from(p: BackendPlatform) -> Self {
        match p {
            BackendPlatform::Linux => "Linux".to_string(),
            BackendPlatform::MacOs => "macOS".to_string(),
            BackendPlatform::Windows => "Windows".to_string(),
            BackendPlatform::Other(s) => s,
        }
    }
}

/// Per-action entry kinds. The set is open-ended; unknown actions are
/// carried through verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    OptIn,
    OptOut,
    EndSession,
    SpectralProfileGeneration,
    MomentGeneration,
    CatalogLoading,
    PvGeneration,
    Other(String),
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        match s.as_str() {
            "optIn" => Self::OptIn,
            "optOut" => Self::OptOut,
            "endSession" => Self::EndSession,
            "spectralProfileGeneration" => Self::SpectralProfileGeneration,
            "momentGeneration" => Self::MomentGeneration,
            "catalogLoading" => Self::CatalogLoading,
            "pvGeneration" => Self::PvGeneration,
            _ => Self::Other(s),
        }
    }
}

impl From<Action> for String {
    fn from(a: Action) -> Self {
        match a {
            Action::OptIn => "optIn".to_string(),
            Action::OptOut => "optOut".to_string(),
            Action::EndSession => "endSession".to_string(),
            Action::SpectralProfileGeneration => "spectralProfileGeneration".to_string(),
            Action::MomentGeneration => "momentGeneration".to_string(),
            Action::CatalogLoading => "catalogLoading".to_string(),
            Action::PvGeneration => "pvGeneration".to_string(),
            Action::Other(s) => s,
        }
    }
}

/// Semantic file dimensionality derived from image header dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "2D")]
    TwoDim,
    #[serde(rename = "3D")]
    ThreeDim,
    #[serde(rename = "2D+Stokes")]
    TwoDimStokes,
    #[serde(rename = "3D+Stokes")]
    ThreeDimStokes,
}

/// The eight ordered file-size buckets. Ordering is part of the contract:
/// the presentation layer's legend relies on smallest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeLabel {
    #[serde(rename = "<1MB")]
    Below1Mb,
    #[serde(rename = "1MB-10MB")]
    Mb1To10,
    #[serde(rename = "10MB-100MB")]
    Mb10To100,
    #[serde(rename = "100MB-1GB")]
    Mb100To1Gb,
    #[serde(rename = "1GB-10GB")]
    Gb1To10,
    #[serde(rename = "10GB-100GB")]
    Gb10To100,
    #[serde(rename = "100GB-1TB")]
    Gb100To1Tb,
    #[serde(rename = "1TB-10TB")]
    Tb1To10,
}

impl SizeLabel {
    pub const ALL: [SizeLabel; 8] = [
        SizeLabel::Below1Mb,
        SizeLabel::Mb1To10,
        SizeLabel::Mb10To100,
        SizeLabel::Mb100To1Gb,
        SizeLabel::Gb1To10,
        SizeLabel::Gb10To100,
        SizeLabel::Gb100To1Tb,
        SizeLabel::Tb1To10,
    ];
}

/// One row of a raw dated registry snapshot export.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotRow {
    pub uuid: String,
    #[serde(rename = "countryCode", default)]
    pub country_code: Option<String>,
}

/// One row of the cumulative on-disk user registry
/// (`users_with_date.csv`). Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub uuid: String,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    /// Date of the snapshot in which this uuid first appeared.
    #[serde(rename = "date")]
    pub registration_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSession {
    pub id: String,
    #[serde(rename = "startTime")]
    pub start_time_ms: i64,
    #[serde(rename = "backendPlatform")]
    pub backend_platform: BackendPlatform,
    #[serde(rename = "backendPlatformInfo.version", default)]
    pub platform_version: Option<String>,
    #[serde(rename = "backendPlatformInfo.distro", default)]
    pub platform_distro: Option<String>,
    #[serde(rename = "backendPlatformInfo.variant", default)]
    pub platform_variant: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "ipHash")]
    pub ip_hash: String,
    pub action: Action,
    pub timestamp: i64,
    #[serde(rename = "countryCode", default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub timestamp: i64,
    #[serde(rename = "details.width", default)]
    pub width: Option<u64>,
    #[serde(rename = "details.height", default)]
    pub height: Option<u64>,
    #[serde(rename = "details.depth", default)]
    pub depth: Option<u64>,
    #[serde(rename = "details.stokes", default)]
    pub stokes: Option<u64>,
}

/// `processed_users.csv` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedUser {
    pub uuid: String,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    pub datetime: NaiveDate,
    pub country: Option<String>,
}

/// `processed_sessions.csv` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSession {
    pub id: String,
    #[serde(rename = "backendPlatform")]
    pub backend_platform: BackendPlatform,
    pub datetime: NaiveDateTime,
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "OS_version")]
    pub os_version: Option<String>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    pub country: Option<String>,
}

/// `processed_entries.csv` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedEntry {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "ipHash")]
    pub ip_hash: String,
    pub action: Action,
    pub datetime: NaiveDateTime,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
}

/// `processed_files.csv` row. The raw dimensions are carried through next
/// to the derived columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedFile {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub datetime: NaiveDateTime,
    #[serde(rename = "details.width")]
    pub width: u64,
    #[serde(rename = "details.height")]
    pub height: u64,
    #[serde(rename = "details.depth")]
    pub depth: u64,
    #[serde(rename = "details.stokes")]
    pub stokes: u64,
    #[serde(rename = "file_type")]
    pub file_type: Option<FileType>,
    /// Estimated size in MB (width × height × depth × stokes × 4 bytes).
    #[serde(rename = "fileSize")]
    pub file_size_mb: f64,
    #[serde(rename = "size_label")]
    pub size_label: Option<SizeLabel>,
}

/// `missing_data_dates.csv` row: one flagged calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDataDate {
    pub datetime: NaiveDate,
}
