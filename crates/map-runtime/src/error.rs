//! Errors reported by the map collaborator.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Source already exists: {0}")]
    DuplicateSource(String),

    #[error("Layer already exists: {0}")]
    DuplicateLayer(String),

    /// The map refused an otherwise well-formed call (style not loaded,
    /// invalid property value, ...).
    #[error("Map rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}
