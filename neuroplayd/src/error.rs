use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not determine data directory")]
    NoDataDir,
}
