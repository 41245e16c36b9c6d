use thiserror::Error;

pub type Result<T> = std::result::Result<T, UsageError>;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Scan task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for UsageError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}
