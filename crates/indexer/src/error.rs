use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("Invalid asset descriptor {path}: {message}")]
    InvalidDescriptor { path: String, message: String },
}

impl IndexerError {
    pub fn invalid_descriptor(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        Self::InvalidDescriptor {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
