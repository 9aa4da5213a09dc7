use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::permission::{Operation, PermissionDenied};
use crate::remote::RemoteError;

/// Unified error type for folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    // Remote store errors
    #[error("Remote {operation} failed: {source}")]
    Remote {
        operation: Operation,
        source: RemoteError,
    },

    #[error("Failed to load workspace '{workspace_id}': {source}")]
    WorkspaceLoad {
        workspace_id: String,
        source: RemoteError,
    },

    // Permission errors
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    // Stale references
    #[error("Document '{0}' not found")]
    DocumentNotFound(String),

    #[error("Block '{0}' not found")]
    BlockNotFound(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl FolioError {
    /// Wrap a remote failure with the operation that hit it.
    pub fn remote(operation: Operation, source: RemoteError) -> Self {
        FolioError::Remote { operation, source }
    }
}

/// Result type alias for folio operations
pub type Result<T> = std::result::Result<T, FolioError>;

/// A serializable representation of FolioError for IPC
#[derive(Debug, Clone, Serialize)]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&FolioError> for SerializableError {
    fn from(err: &FolioError) -> Self {
        let kind = match err {
            FolioError::Remote { .. } => "Remote",
            FolioError::WorkspaceLoad { .. } => "WorkspaceLoad",
            FolioError::PermissionDenied(_) => "PermissionDenied",
            FolioError::DocumentNotFound(_) => "DocumentNotFound",
            FolioError::BlockNotFound(_) => "BlockNotFound",
            FolioError::Io(_) => "Io",
            FolioError::FileRead { .. } => "FileRead",
            FolioError::FileWrite { .. } => "FileWrite",
            FolioError::Json(_) => "Json",
            FolioError::ConfigParse(_) => "ConfigParse",
            FolioError::ConfigSerialize(_) => "ConfigSerialize",
            FolioError::NoConfigDir => "NoConfigDir",
        }
        .to_string();

        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<FolioError> for SerializableError {
    fn from(err: FolioError) -> Self {
        SerializableError::from(&err)
    }
}

impl FolioError {
    /// Convert to a serializable representation for IPC
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }
}
