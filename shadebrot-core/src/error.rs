use thiserror::Error;

/// Errors originating from the core escape-time engine and its configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid zoom table: {reason}")]
    InvalidZoomTable { reason: String },

    #[error("palette needs at least 2 anchor colors, got {0}")]
    TooFewAnchors(usize),

    #[error("invalid preset '{name}': {reason}")]
    InvalidPreset { name: String, reason: String },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}
