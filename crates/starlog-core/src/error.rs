use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A snapshot file whose capture date cannot be derived from its name,
    /// or whose uuid column is missing. Fatal: the run aborts and the
    /// previous registry file is left untouched.
    #[error("Malformed snapshot {path}: {reason}")]
    MalformedSnapshot { path: String, reason: String },

    /// No threshold entry covers the given year, even after the
    /// fall-back-to-previous-year rule. Fatal configuration error; a silent
    /// zero threshold would flag every date as missing.
    #[error("No volume threshold covers year {0}")]
    ThresholdGap(i32),

    #[error("{0}")]
    Other(String),
}
