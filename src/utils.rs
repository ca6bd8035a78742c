use crate::observations::error::ObservationError;
use chrono::NaiveDate;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const DEFAULT_DATA_DIR: &str = "data/processed";
const DATA_FILE_EXTENSION: &str = "parquet";

// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a Polars `Date` physical value (days since the Unix epoch) to a `NaiveDate`.
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// Finds the most recently modified parquet file directly inside `dir`.
pub async fn latest_data_file(dir: &Path) -> Result<PathBuf, ObservationError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ObservationError::DataDirRead(dir.to_path_buf(), e))?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ObservationError::DataDirRead(dir.to_path_buf(), e))?
    {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(DATA_FILE_EXTENSION) {
            continue;
        }
        let metadata = entry
            .metadata()
            .await
            .map_err(|e| ObservationError::DataFileMetadata(path.clone(), e))?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .map_err(|e| ObservationError::DataFileMetadata(path.clone(), e))?;
        debug!("Found data file {} (modified {:?})", path.display(), modified);
        if newest.as_ref().map_or(true, |(seen, _)| modified > *seen) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| ObservationError::NoDataFile(dir.to_path_buf()))
}
