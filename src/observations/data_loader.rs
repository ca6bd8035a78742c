use crate::observations::error::ObservationError;
use crate::types::observation_frame::ObservationFrame;
use crate::utils::{latest_data_file, DEFAULT_DATA_DIR};
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub struct ObservationLoader {
    data_dir: PathBuf,
}

impl Default for ObservationLoader {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_DATA_DIR))
    }
}

impl ObservationLoader {
    pub fn new(data_dir: &Path) -> ObservationLoader {
        ObservationLoader {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads the most recently modified parquet file of the data directory.
    pub async fn load_latest(&self) -> Result<ObservationFrame, ObservationError> {
        let path = latest_data_file(&self.data_dir).await?;
        info!("Loading newest observation file {}", path.display());
        self.load_file(&path)
    }

    /// Scans a parquet file and normalizes its `date` column.
    /// Returns a lazy frame; rows are only read when it is collected.
    pub fn load_file(&self, path: &Path) -> Result<ObservationFrame, ObservationError> {
        let frame = LazyFrame::scan_parquet(path, Default::default())
            .map_err(|e| ObservationError::ParquetScan(path.to_path_buf(), e))?;
        ObservationFrame::from_frame(frame)
    }
}
