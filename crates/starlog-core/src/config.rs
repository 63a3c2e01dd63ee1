use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Pipeline directory layout.
///
/// `users_csv_dir` holds the dated registry snapshot exports,
/// `dumped_file_dir` the raw event logs (and the cumulative registry file),
/// `processed_file_dir` the derived output tables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub users_csv_dir: String,
    pub dumped_file_dir: String,
    pub processed_file_dir: String,
}

pub const REGISTRY_FILE: &str = "users_with_date.csv";

impl AppConfig {
    pub fn registry_path(&self) -> PathBuf {
        Path::new(&self.dumped_file_dir).join(REGISTRY_FILE)
    }

    pub fn raw_path(&self, name: &str) -> PathBuf {
        Path::new(&self.dumped_file_dir).join(name)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        Path::new(&self.processed_file_dir).join(name)
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("users_csv_dir", "./data/users")?
        .set_default("dumped_file_dir", "./data/dumped")?
        .set_default("processed_file_dir", "./data/processed")?
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
