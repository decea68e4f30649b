//! Cross-platform application paths

use std::fs;
use std::path::{Path, PathBuf};

use neuroplay::store::STORAGE_KEY;

use crate::error::DaemonError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    /// Use `override_dir` when given, otherwise the OS data directory.
    pub fn new(override_dir: Option<PathBuf>) -> Result<Self, DaemonError> {
        let data_dir = match override_dir {
            Some(dir) => dir,
            None => Self::default_data_dir()?,
        };

        // Ensure directory exists
        fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }

    fn default_data_dir() -> Result<PathBuf, DaemonError> {
        let base = dirs::data_dir().ok_or(DaemonError::NoDataDir)?;
        Ok(base.join("neuroplay"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn scores_file(&self) -> PathBuf {
        self.data_dir.join(format!("{STORAGE_KEY}.json"))
    }
}
