use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read installs directory {path:?}: {source}")]
    ReadInstallsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan task for {manager} did not complete: {reason}")]
    TaskAborted { manager: String, reason: String },
}
