//! Snapshot of a finished run's samples, written as a JSON array.

use std::path::{Path, PathBuf};

use trainwatch_core::sample::MetricSample;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to serialize samples: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write `samples` to `path`, replacing any existing file.
pub async fn save_samples(path: &Path, samples: &[MetricSample]) -> Result<(), PersistError> {
    let json = serde_json::to_vec_pretty(samples)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })
}
