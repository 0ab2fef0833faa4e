use thiserror::Error;

/// Errors surfaced by the annotation editor.
///
/// Undo/redo at a history boundary and an empty hit-test are normal
/// outcomes and never show up here.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The drawing surface could not be acquired; the session cannot start.
    #[error("Drawing surface unavailable: {0}")]
    ResourceUnavailable(String),

    /// Non-finite or degenerate geometry. The offending element is dropped.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Merging the base image and the vector layer failed.
    #[error("Export failed: {0}")]
    ExportFailure(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid font data: {0}")]
    Font(String),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
