//! Render pipeline errors.

use flowink_core::{ConfigError, ElementId, GraphError};
use thiserror::Error;

/// Render pipeline errors.
///
/// All variants are fatal to the render in progress; nothing is skipped
/// silently.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No renderer registered for type {type_tag:?} (element {id})")]
    UnknownElementType { type_tag: String, id: ElementId },
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] ConfigError),
    #[error("Graph view is not mounted")]
    NotMounted,
    #[error("Graph view is already mounted")]
    AlreadyMounted,
    #[error("Event handler failed: {0}")]
    Handler(#[from] GraphError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
