//! CSV read/write helpers. All writes go through a temp-file-then-rename so
//! that a concurrently-reading presentation layer never observes a partial
//! table and a failed run never corrupts the previous good output.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Error;

pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Atomic replace: serialize into a temp file in the destination directory,
/// then rename over the target.
pub fn write_rows_atomic<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Error> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new()?,
    };

    {
        let mut writer = csv::Writer::from_writer(&mut tmp);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
