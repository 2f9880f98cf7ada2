use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("color ramp needs at least 2 anchor colors, got {0}")]
    TooFewAnchors(usize),

    #[error("{anchors} anchors do not fit in a ramp of {len} entries")]
    TooManyAnchors { anchors: usize, len: usize },

    #[error("invalid ramp length: {0} (must be > 0)")]
    InvalidRampLength(usize),

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] shadebrot_core::CoreError),
}
