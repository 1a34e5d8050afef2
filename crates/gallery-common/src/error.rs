//! Unified error type for the gallery store.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for the HTTP layer to derive a status code via [`Error::http_status`].

use crate::types::Entity;

/// Unified error type covering all failure modes of the gallery store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The addressed entity, or its outermost missing ancestor, does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Which level of the tree was missing.
        entity: Entity,
        /// The identifier that was looked up.
        id: u64,
    },

    /// The uploaded bytes could not be decoded as a supported raster image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A step of the ingestion pipeline failed after a successful decode.
    #[error("Pipeline error [{step}]: {message}")]
    Pipeline {
        /// The pipeline step that failed.
        step: String,
        /// Human-readable error description.
        message: String,
    },

    /// The caller may not perform a write.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A storage engine operation failed; the transaction was rolled back.
    #[error("Database error: {source}")]
    Database {
        /// The underlying engine error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Decode(_) => 422,
            Error::Pipeline { .. } => 500,
            Error::Forbidden(_) => 403,
            Error::Validation(_) => 400,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: Entity, id: impl Into<u64>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode(message.into())
    }

    /// Convenience constructor for [`Error::Pipeline`].
    pub fn pipeline(step: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Pipeline {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Whether this error reports a missing entity of the given kind.
    pub fn is_not_found(&self, kind: Entity) -> bool {
        matches!(self, Error::NotFound { entity, .. } if *entity == kind)
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
