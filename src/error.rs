//! Error types for document inventory and placeholder replacement.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Failures that
//! belong to a single document or tree node are usually turned into data (an
//! `error` field on an [`InventoryNode`](crate::document::InventoryNode) or a
//! [`Report`](crate::document::Report)) by the walking operations; only
//! invocation-level failures escape them.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad arguments, malformed tokens or unusable paths.
    #[error("{0}")]
    Validation(String),

    /// The user declined an interactive confirmation.
    #[error("{0}")]
    Aborted(String),

    /// Input path missing, or no document beneath it.
    #[error("{0}")]
    NotFound(String),

    #[error("Failed to read {}. It is not readable.", path.display())]
    AccessDenied { path: PathBuf },

    #[error("Failed to modify {}. It is not writable.", path.display())]
    NotWritable { path: PathBuf },

    #[error("Reading error. It might not be a valid ODT file. Error message: {source}")]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{} is not a supported ODT container: {source}", path.display())]
    UnsupportedContainer {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Malformed XML: {0}")]
    MalformedDocument(String),

    #[error("Reading error. Error message: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`], used to pick log severity and exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Aborted,
    NotFound,
    AccessDenied,
    CorruptArchive,
    UnsupportedContainer,
    MalformedDocument,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Config(_) => ErrorKind::Validation,
            Error::Aborted(_) => ErrorKind::Aborted,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::AccessDenied { .. } | Error::NotWritable { .. } => ErrorKind::AccessDenied,
            Error::CorruptArchive { .. } => ErrorKind::CorruptArchive,
            Error::UnsupportedContainer { .. } => ErrorKind::UnsupportedContainer,
            Error::MalformedDocument(_) => ErrorKind::MalformedDocument,
            Error::Io(_) | Error::Json(_) => ErrorKind::Io,
        }
    }

    /// Errors attributable to one document rather than the whole invocation.
    pub fn is_document_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AccessDenied
                | ErrorKind::CorruptArchive
                | ErrorKind::UnsupportedContainer
                | ErrorKind::MalformedDocument
                | ErrorKind::Io
        )
    }

    pub(crate) fn malformed(reason: impl std::fmt::Display) -> Self {
        Error::MalformedDocument(reason.to_string())
    }
}
