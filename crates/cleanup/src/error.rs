use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeletionError>;

#[derive(Error, Debug)]
pub enum DeletionError {
    #[error("Asset not found at path: {0}")]
    AssetPathMissing(PathBuf),

    #[error("Failed to create backup at {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    DeletionFailed {
        path: PathBuf,
        /// The backup taken before the removal attempt, if any. It is kept.
        backup_path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl DeletionError {
    /// Stable snake_case code carried in results and error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AssetPathMissing(_) => "asset_path_missing",
            Self::BackupFailed { .. } => "backup_failed",
            Self::DeletionFailed { .. } => "deletion_failed",
        }
    }

    pub fn backup_path(&self) -> Option<&PathBuf> {
        match self {
            Self::DeletionFailed { backup_path, .. } => backup_path.as_ref(),
            _ => None,
        }
    }
}
