use janitor_indexer::IndexerError;
use janitor_protocol::ErrorEnvelope;
use janitor_usage::UsageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}

impl ServiceError {
    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Stable snake_case code for structured failures.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingArgument(_) => "missing_argument",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::AssetNotFound(_) => "asset_not_found",
            Self::Indexer(err) => match err {
                IndexerError::ProjectNotFound(_) => "project_not_found",
                IndexerError::CatalogNotFound(_) => "catalog_not_found",
                IndexerError::InvalidDescriptor { .. } => "invalid_descriptor",
                IndexerError::IoError(_) => "io_error",
            },
            Self::Usage(_) => "scan_failed",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
            Self::UnknownTool(_) => "unknown_tool",
            Self::TaskFailed(_) => "task_failed",
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingArgument(name) => Some(format!("Pass `{name}` with the request")),
            Self::AssetNotFound(_) => Some(
                "Asset names are catalog directory names without the set suffix; run index_assets to refresh".to_string(),
            ),
            Self::Indexer(IndexerError::ProjectNotFound(_)) => {
                Some("Pass the absolute path of the project root".to_string())
            }
            Self::UnknownTool(_) => Some(format!(
                "Known tools: {}",
                crate::dispatch::ToolName::ALL
                    .iter()
                    .map(|tool| tool.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            _ => None,
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            code: self.code().to_string(),
            message: self.to_string(),
            hint: self.hint(),
        }
    }
}
